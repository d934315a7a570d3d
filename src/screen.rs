//! Screens offered to staff. Operational screens act on individual students;
//! reporting screens aggregate the historical dataset.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Operations,
    Reporting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Register,
    AlertBoard,
    LogIntervention,
    StudentRecord,
    RegistrationQueue,
    Overview,
    AtRisk,
    Retention,
    Growth,
    Campus,
}

impl Screen {
    pub const ALL: [Screen; 10] = [
        Screen::Register,
        Screen::AlertBoard,
        Screen::LogIntervention,
        Screen::StudentRecord,
        Screen::RegistrationQueue,
        Screen::Overview,
        Screen::AtRisk,
        Screen::Retention,
        Screen::Growth,
        Screen::Campus,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Register => "Register New Student",
            Screen::AlertBoard => "At-Risk Alert Board",
            Screen::LogIntervention => "Log Intervention",
            Screen::StudentRecord => "Check Student Record",
            Screen::RegistrationQueue => "Registration Queue",
            Screen::Overview => "Student Overview",
            Screen::AtRisk => "At-Risk Students",
            Screen::Retention => "Graduation & Retention",
            Screen::Growth => "Enrollment Growth",
            Screen::Campus => "Campus Performance",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Screen::Register => "register",
            Screen::AlertBoard => "alert-board",
            Screen::LogIntervention => "log-intervention",
            Screen::StudentRecord => "student-record",
            Screen::RegistrationQueue => "registration-queue",
            Screen::Overview => "overview",
            Screen::AtRisk => "at-risk",
            Screen::Retention => "retention",
            Screen::Growth => "growth",
            Screen::Campus => "campus",
        }
    }

    pub fn surface(&self) -> Surface {
        match self {
            Screen::Register
            | Screen::AlertBoard
            | Screen::LogIntervention
            | Screen::StudentRecord
            | Screen::RegistrationQueue => Surface::Operations,
            _ => Surface::Reporting,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
