/// File names of the tables making up a network feed.
#[derive(Debug, Clone)]
pub struct Config {
    pub stops_file_name: String,
    pub edges_file_name: String,
    pub lines_file_name: String,
    pub line_edges_file_name: String,
    pub schedules_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stops_file_name: "stops.txt".into(),
            edges_file_name: "edges.txt".into(),
            lines_file_name: "lines.txt".into(),
            line_edges_file_name: "line_edges.txt".into(),
            schedules_file_name: "schedules.txt".into(),
        }
    }
}
