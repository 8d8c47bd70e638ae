use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StopRow {
    pub stop_id: String,
    pub stop_code: Option<String>,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EdgeRow {
    pub edge_id: String,
    pub from_stop_id: String,
    pub to_stop_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LineRow {
    pub line_id: String,
    pub line_name: String,
}

/// Places an edge on a line's canonical path.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LineEdgeRow {
    pub line_id: String,
    pub edge_id: String,
    pub edge_sequence: u32,
}

/// One call of one trip, the time is `HH:MM` or `HH:MM:SS`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScheduleRow {
    pub schedule_id: String,
    pub line_id: String,
    pub stop_id: String,
    pub time: String,
}
