//! Column mapping for panel ingestion

/// Names of the columns holding the subject id, the monitored value and time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub subject: String,
    pub value: String,
    pub time: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            subject: "patient_id".to_string(),
            value: "glucose".to_string(),
            time: "time".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn new(
        subject: impl Into<String>,
        value: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            value: value.into(),
            time: time.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }
}
