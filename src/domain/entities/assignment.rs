use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label used when an assignment has no client name.
pub const DEFAULT_SERVICE_LABEL: &str = "Servicio";

/// Which kind of day an assignment is eligible to appear on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssignmentType {
    /// Weekdays only
    Laborables,
    /// Holidays only
    Festivos,
    /// Any day
    Flexible,
    Other(String),
}

impl AssignmentType {
    pub fn as_str(&self) -> &str {
        match self {
            AssignmentType::Laborables => "laborables",
            AssignmentType::Festivos => "festivos",
            AssignmentType::Flexible => "flexible",
            AssignmentType::Other(raw) => raw,
        }
    }

    /// Forces holiday slots regardless of the day.
    pub fn is_holiday_only(&self) -> bool {
        matches!(self, AssignmentType::Festivos)
    }

    pub fn display_name(&self) -> &str {
        match self {
            AssignmentType::Laborables => "Laborable",
            AssignmentType::Festivos => "Festivo",
            AssignmentType::Flexible => "Flexible",
            AssignmentType::Other(_) => "Otro",
        }
    }
}

impl Default for AssignmentType {
    fn default() -> Self {
        AssignmentType::Other(String::new())
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "laborables" | "working_days" => AssignmentType::Laborables,
            "festivos" | "holidays" => AssignmentType::Festivos,
            "flexible" => AssignmentType::Flexible,
            _ => AssignmentType::Other(s.to_string()),
        })
    }
}

impl From<&str> for AssignmentType {
    fn from(raw: &str) -> Self {
        match raw.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl Serialize for AssignmentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssignmentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(AssignmentType::from(raw.as_deref().unwrap_or_default()))
    }
}

/// The client served by an assignment (`users` relation on the backend).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
}

impl ClientRef {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.name.as_deref().unwrap_or_default(),
            self.surname.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// A recurring service commitment between a worker and a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub assignment_type: AssignmentType,
    /// Raw weekly schedule as stored: either the object or a JSON string.
    pub schedule: serde_json::Value,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub weekly_hours: Option<f64>,
    pub client: Option<ClientRef>,
}

impl Assignment {
    pub fn new(
        id: impl Into<String>,
        assignment_type: AssignmentType,
        schedule: serde_json::Value,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            assignment_type,
            schedule,
            start_date,
            end_date: None,
            weekly_hours: None,
            client: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_client(mut self, client: ClientRef) -> Self {
        self.client = Some(client);
        self
    }

    /// `start_date <= date` and the assignment has not ended before `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }

    /// Client full name, or the generic service label.
    pub fn label(&self) -> String {
        let name = self
            .client
            .as_ref()
            .map(ClientRef::full_name)
            .unwrap_or_default();
        if name.is_empty() {
            DEFAULT_SERVICE_LABEL.to_string()
        } else {
            name
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.address.as_deref())
    }
}
