use url::Url;

const EMBED_BASE: &str = "https://app.powerbi.com/reportEmbed";
const TENANT_VAR: &str = "POWERBI_TENANT_ID";
const SHARED_REPORT_VAR: &str = "POWERBI_REPORT_ID";

/// The analytics reports shown on the Analytics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsReport {
    Timeline,
    Regions,
    Actors,
    Casualties,
}

impl AnalyticsReport {
    pub const ALL: [Self; 4] = [Self::Timeline, Self::Regions, Self::Actors, Self::Casualties];

    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Timeline => "POWERBI_TIMELINE_REPORT_ID",
            Self::Regions => "POWERBI_REGIONS_REPORT_ID",
            Self::Actors => "POWERBI_ACTORS_REPORT_ID",
            Self::Casualties => "POWERBI_CASUALTIES_REPORT_ID",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Timeline => "Conflict Events Timeline",
            Self::Regions => "Regional Breakdown",
            Self::Actors => "Conflict Actors",
            Self::Casualties => "Casualty Analysis",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Timeline => "Temporal analysis of conflict events, deaths, and patterns over time",
            Self::Regions => "Geographic distribution of conflict events by region and country",
            Self::Actors => "Analysis of the parties involved in conflict events",
            Self::Casualties => "Breakdown of fatalities by type and civilian impact",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Timeline),
            1 => Some(Self::Regions),
            2 => Some(Self::Actors),
            3 => Some(Self::Casualties),
            _ => None,
        }
    }
}

/// Resolved embed target for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedTarget {
    Ready(Url),
    /// Lists the settings that are missing.
    NotConfigured(Vec<&'static str>),
}

/// Analytics embed identifiers; absent values make the panel show a notice instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsEmbed {
    tenant_id: Option<String>,
    shared_report_id: Option<String>,
    report_ids: Vec<(AnalyticsReport, String)>,
}

impl AnalyticsEmbed {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            tenant_id: value(TENANT_VAR),
            shared_report_id: value(SHARED_REPORT_VAR),
            report_ids: AnalyticsReport::ALL
                .into_iter()
                .filter_map(|report| value(report.env_var()).map(|id| (report, id)))
                .collect(),
        }
    }

    pub fn target(&self, report: AnalyticsReport) -> EmbedTarget {
        let report_id = self
            .report_ids
            .iter()
            .find(|(candidate, _)| *candidate == report)
            .map(|(_, id)| id)
            .or(self.shared_report_id.as_ref());

        match (report_id, &self.tenant_id) {
            (Some(report_id), Some(tenant_id)) => {
                match Url::parse_with_params(
                    EMBED_BASE,
                    [
                        ("reportId", report_id.as_str()),
                        ("autoAuth", "true"),
                        ("ctid", tenant_id.as_str()),
                    ],
                ) {
                    Ok(url) => EmbedTarget::Ready(url),
                    Err(_) => EmbedTarget::NotConfigured(vec![report.env_var()]),
                }
            }
            (report_id, tenant_id) => {
                let mut missing = Vec::new();
                if report_id.is_none() {
                    missing.push(report.env_var());
                }
                if tenant_id.is_none() {
                    missing.push(TENANT_VAR);
                }
                EmbedTarget::NotConfigured(missing)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        AnalyticsReport::ALL
            .into_iter()
            .any(|report| matches!(self.target(report), EmbedTarget::Ready(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn embed(vars: &[(&str, &str)]) -> AnalyticsEmbed {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AnalyticsEmbed::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn builds_embed_url_from_report_and_tenant() {
        let embed = embed(&[("POWERBI_REPORT_ID", "abc-123"), ("POWERBI_TENANT_ID", "t-9")]);

        let EmbedTarget::Ready(url) = embed.target(AnalyticsReport::Timeline) else {
            panic!("expected a ready target");
        };
        assert_eq!(
            url.as_str(),
            "https://app.powerbi.com/reportEmbed?reportId=abc-123&autoAuth=true&ctid=t-9"
        );
    }

    #[test]
    fn per_report_id_overrides_shared_id() {
        let embed = embed(&[
            ("POWERBI_REPORT_ID", "shared"),
            ("POWERBI_ACTORS_REPORT_ID", "actors"),
            ("POWERBI_TENANT_ID", "t"),
        ]);

        let EmbedTarget::Ready(url) = embed.target(AnalyticsReport::Actors) else {
            panic!("expected a ready target");
        };
        assert!(url.as_str().contains("reportId=actors"));
    }

    #[test]
    fn missing_identifiers_are_reported_not_fatal() {
        let embed = embed(&[("POWERBI_TENANT_ID", "  ")]);

        assert!(!embed.is_configured());
        assert_eq!(
            embed.target(AnalyticsReport::Regions),
            EmbedTarget::NotConfigured(vec!["POWERBI_REGIONS_REPORT_ID", "POWERBI_TENANT_ID"])
        );
    }
}
