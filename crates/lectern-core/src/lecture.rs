use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "External_ID", default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "External_ID", default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "External_ID", default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "RoomNumber")]
    pub room_number: String,

    #[serde(rename = "External_ID", default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Hex")]
    pub hex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Period", default)]
    pub period: String,

    #[serde(rename = "StartTime")]
    pub start_time: String,

    #[serde(rename = "EndTime")]
    pub end_time: String,

    #[serde(rename = "Subject")]
    pub subject: Subject,

    #[serde(rename = "Lecturers", default)]
    pub lecturers: Vec<Lecturer>,

    #[serde(rename = "Rooms", default)]
    pub rooms: Vec<Room>,

    #[serde(rename = "Groups", default)]
    pub groups: Vec<Group>,

    #[serde(rename = "Colors", default)]
    pub colors: Vec<Color>,
}

impl Lecture {
    pub fn time_span(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    pub fn lecturer_names(&self) -> String {
        self.lecturers
            .iter()
            .map(|lecturer| lecturer.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn room_numbers(&self) -> String {
        self.rooms
            .iter()
            .map(|room| room.room_number.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn group_names(&self) -> String {
        self.groups
            .iter()
            .map(|group| group.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub group: UserGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: i64,
    pub name: String,
}
