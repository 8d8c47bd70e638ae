use std::{fs, io::Write, path::Path};

use headway::{
    loader::{self, NetworkReader},
    prelude::*,
    repository,
};
use zip::{ZipWriter, write::SimpleFileOptions};

const STOPS: &str = "\
stop_id,stop_code,stop_name,stop_lat,stop_lon
24,KGL,Kraków Główny,50.068394,19.947503
23,,Kraków Grzegórzki,50.057534,19.947919
22,,Kraków Zabłocie,50.048438,19.956833
";

const EDGES: &str = "\
edge_id,from_stop_id,to_stop_id
e1,24,23
e2,23,22
";

const LINES: &str = "\
line_id,line_name
SKA1,Kraków Główny - Wieliczka
";

// Out of order on purpose, the sequence column decides
const LINE_EDGES: &str = "\
line_id,edge_id,edge_sequence
SKA1,e2,2
SKA1,e1,1
";

const SCHEDULES: &str = "\
schedule_id,line_id,stop_id,time
t1,SKA1,24,06:00
t1,SKA1,23,06:04:30
t1,SKA1,22,06:09
t2,SKA1,22,06:30
t2,SKA1,23,06:35
t2,SKA1,24,06:41
";

fn tables<'a>(schedules: &'a str) -> [(&'static str, &'a str); 5] {
    [
        ("stops.txt", STOPS),
        ("edges.txt", EDGES),
        ("lines.txt", LINES),
        ("line_edges.txt", LINE_EDGES),
        ("schedules.txt", schedules),
    ]
}

fn write_directory(dir: &Path, schedules: &str) {
    for (name, content) in tables(schedules) {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn check(repository: &Repository) {
    assert_eq!(repository.stops.len(), 3);
    assert_eq!(repository.edges.len(), 2);
    assert_eq!(repository.lines.len(), 1);
    assert_eq!(repository.schedules.len(), 2);

    let glowny = repository.stop_by_id("24").unwrap();
    assert_eq!(glowny.code.as_deref(), Some("KGL"));
    assert!(repository.stop_by_id("23").unwrap().code.is_none());

    let stops: Vec<_> = repository
        .stops_by_line_id("SKA1")
        .unwrap()
        .into_iter()
        .map(|stop| stop.id.to_string())
        .collect();
    assert_eq!(stops, vec!["24", "23", "22"]);

    let itinerary = repository
        .router("24", "22")
        .solve()
        .unwrap()
        .unwrap();
    assert_eq!(itinerary.arrival_time, Time::from_hm(6, 9));
    assert_eq!(
        itinerary.segments[0].calls[1].time,
        Time::from_hms("06:04:30").unwrap()
    );
}

#[test]
fn load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), SCHEDULES);
    let repository = Repository::load(NetworkReader::new().from_directory(dir.path())).unwrap();
    check(&repository);
}

#[test]
fn load_from_zip() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut writer = ZipWriter::new(file.reopen().unwrap());
    for (name, content) in tables(SCHEDULES) {
        writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();

    let repository = Repository::load(NetworkReader::new().from_zip(file.path())).unwrap();
    check(&repository);
}

#[test]
fn custom_file_names() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), SCHEDULES);
    fs::rename(dir.path().join("stops.txt"), dir.path().join("stations.csv")).unwrap();
    let config = loader::Config {
        stops_file_name: "stations.csv".into(),
        ..Default::default()
    };
    let reader = NetworkReader::new()
        .with_config(config)
        .from_directory(dir.path());
    check(&Repository::load(reader).unwrap());
}

#[test]
fn missing_table() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), SCHEDULES);
    fs::remove_file(dir.path().join("edges.txt")).unwrap();
    let err = Repository::load(NetworkReader::new().from_directory(dir.path())).unwrap_err();
    assert!(matches!(err, loader::Error::FileNotFound(name) if name == "edges.txt"));
}

#[test]
fn invalid_time() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(
        dir.path(),
        "schedule_id,line_id,stop_id,time\nt1,SKA1,24,6h00\n",
    );
    let err = Repository::load(NetworkReader::new().from_directory(dir.path())).unwrap_err();
    match err {
        loader::Error::InvalidTime { schedule, value } => {
            assert_eq!(schedule, "t1");
            assert_eq!(value, "6h00");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schedule_with_unknown_stop() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(
        dir.path(),
        "schedule_id,line_id,stop_id,time\nt1,SKA1,24,06:00\nt1,SKA1,99,06:05\n",
    );
    let err = Repository::load(NetworkReader::new().from_directory(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        loader::Error::Network(repository::Error::UnknownStopReference { .. })
    ));
}

#[test]
fn schedule_rows_naming_different_lines() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(
        dir.path(),
        "schedule_id,line_id,stop_id,time\nt1,SKA1,24,06:00\nt1,SKA2,23,06:05\n",
    );
    let err = Repository::load(NetworkReader::new().from_directory(dir.path())).unwrap_err();
    match err {
        loader::Error::ConflictingScheduleLine {
            schedule,
            line,
            other,
        } => {
            assert_eq!(schedule, "t1");
            assert_eq!(line, "SKA1");
            assert_eq!(other, "SKA2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_reader_gives_empty_network() {
    let repository = Repository::load(NetworkReader::new()).unwrap();
    assert!(repository.stops.is_empty());
    assert!(repository.lines.is_empty());
}
