use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
};
use thiserror::Error;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
use models::*;

use crate::repository;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Schedule {schedule} has an invalid time: {value}")]
    InvalidTime { schedule: String, value: String },
    #[error("Schedule {schedule} is on line {line} but a row names line {other}")]
    ConflictingScheduleLine {
        schedule: String,
        line: String,
        other: String,
    },
    #[error("Invalid network: {0}")]
    Network(#[from] repository::Error),
}

#[derive(Debug, Default)]
pub enum StorageType {
    #[default]
    None,
    Zip(PathBuf),
    Directory(PathBuf),
}

/// Streams the CSV tables of a network feed from a zip archive or a directory.
#[derive(Debug, Default)]
pub struct NetworkReader {
    config: Config,
    storage: StorageType,
}

impl NetworkReader {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: self::Config) -> Self {
        self.config = config;
        self
    }

    pub fn from_zip(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage = StorageType::Zip(path.into());
        self
    }

    pub fn from_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage = StorageType::Directory(path.into());
        self
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, StopRow)),
    {
        self.stream(&self.config.stops_file_name, f)
    }

    pub fn stream_edges<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, EdgeRow)),
    {
        self.stream(&self.config.edges_file_name, f)
    }

    pub fn stream_lines<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, LineRow)),
    {
        self.stream(&self.config.lines_file_name, f)
    }

    pub fn stream_line_edges<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, LineEdgeRow)),
    {
        self.stream(&self.config.line_edges_file_name, f)
    }

    pub fn stream_schedules<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, ScheduleRow)),
    {
        self.stream(&self.config.schedules_file_name, f)
    }

    fn stream<T, F>(&self, file_name: &str, f: F) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        F: FnMut((usize, T)),
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Zip(path) => {
                let mut archive = ZipArchive::new(File::open(path)?)?;
                let index = archive
                    .index_for_name(file_name)
                    .ok_or_else(|| self::Error::FileNotFound(file_name.to_string()))?;
                let file = archive.by_index(index)?;
                stream_csv(file, f)
            }
            StorageType::Directory(path) => {
                let path = path.join(file_name);
                if !path.is_file() {
                    return Err(self::Error::FileNotFound(file_name.to_string()));
                }
                stream_csv(File::open(path)?, f)
            }
        }
    }
}

fn stream_csv<R, T, F>(reader: R, mut f: F) -> Result<(), self::Error>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (i, record) in reader.deserialize().enumerate() {
        f((i, record?));
    }
    Ok(())
}
