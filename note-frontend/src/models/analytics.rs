use serde::Deserialize;
use std::collections::BTreeMap;

/// Everything `GET /analytics` returns, deserialized permissively: a
/// backend that omits a section yields an empty one rather than a
/// failed dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsReport {
    #[serde(default)]
    pub top_users: Vec<TopUser>,
    #[serde(default)]
    pub top_tags: Vec<TagUsage>,
    #[serde(default)]
    pub notes_per_day: Vec<NotesPerDay>,
    #[serde(default)]
    pub login_logout_activity: BTreeMap<String, LoginLogoutStats>,
    #[serde(default)]
    pub study_activity: BTreeMap<String, StudyStats>,
    #[serde(default)]
    pub daily_activity: BTreeMap<String, DailyActivity>,
    #[serde(default)]
    pub most_active_chart: ActivityChart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopUser {
    pub email: String,
    #[serde(default)]
    pub note_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagUsage {
    pub tag: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotesPerDay {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginLogoutStats {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_time_formatted: String,
    #[serde(default)]
    pub login_count: u64,
    #[serde(default)]
    pub logout_count: u64,
    #[serde(default)]
    pub avg_session_duration: f64,
    #[serde(default)]
    pub last_activity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyStats {
    #[serde(default)]
    pub total_study_time_formatted: String,
    #[serde(default)]
    pub study_sessions: u64,
    #[serde(default)]
    pub pages_visited: u64,
    #[serde(default)]
    pub avg_session_time: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyActivity {
    #[serde(default)]
    pub logins: u64,
    #[serde(default)]
    pub logouts: u64,
    #[serde(default)]
    pub study_sessions: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityChart {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub formatted_data: Vec<String>,
}

impl ActivityChart {
    /// (label, seconds, formatted) rows for table rendering; the chart
    /// arrays are positional and may be ragged, so missing formatted
    /// values degrade to the raw number.
    pub fn rows(&self) -> Vec<(String, f64, String)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let seconds = self.data.get(i).copied().unwrap_or(0.0);
                let formatted = self
                    .formatted_data
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("{seconds}s"));
                (label.clone(), seconds, formatted)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let report: AnalyticsReport = serde_json::from_str("{}").unwrap();
        assert!(report.top_users.is_empty());
        assert!(report.daily_activity.is_empty());
        assert!(report.most_active_chart.labels.is_empty());
    }

    #[test]
    fn chart_rows_tolerate_ragged_arrays() {
        let chart = ActivityChart {
            labels: vec!["a@example.com".into(), "b@example.com".into()],
            data: vec![120.0],
            formatted_data: vec![],
        };
        let rows = chart.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, 120.0);
        assert_eq!(rows[1].1, 0.0);
    }
}
