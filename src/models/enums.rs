use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        $(#[$meta])*
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Triage class. Variant order is severity order.
    #[derive(PartialOrd, Ord)]
    Severity {
        Unknown => "unknown",
        Moderate => "moderate",
        Urgent => "urgent",
        Critical => "critical",
    }
);

impl Severity {
    /// Map a 0-100 triage score onto a severity class.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Unknown,
            1..=54 => Self::Moderate,
            55..=84 => Self::Urgent,
            _ => Self::Critical,
        }
    }
}

str_enum!(HospitalStatus {
    Accepting => "accepting",
    Diverting => "diverting",
});

str_enum!(TriggerKind {
    Voice => "voice",
    Sensor => "sensor",
    VoiceAndSensor => "voice_and_sensor",
});

str_enum!(OutcomeKind {
    NoEmergency => "no_emergency",
    CriticalEscalated => "critical_escalated",
    HospitalAlerted => "hospital_alerted",
    NoHospitalAvailable => "no_hospital_available",
    NoHospitalReached => "no_hospital_reached",
});

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 5] = [
        Self::NoEmergency,
        Self::CriticalEscalated,
        Self::HospitalAlerted,
        Self::NoHospitalAvailable,
        Self::NoHospitalReached,
    ];
}

str_enum!(NotificationKind {
    HospitalAlert => "hospital_alert",
    EmergencyServices => "emergency_services",
    Contact => "contact",
});

str_enum!(DeliveryStatus {
    Delivered => "delivered",
    Failed => "failed",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::Unknown, "unknown"),
            (Severity::Moderate, "moderate"),
            (Severity::Urgent, "urgent"),
            (Severity::Critical, "critical"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Unknown < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Urgent);
        assert!(Severity::Urgent < Severity::Critical);
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::from_score(0), Severity::Unknown);
        assert_eq!(Severity::from_score(1), Severity::Moderate);
        assert_eq!(Severity::from_score(54), Severity::Moderate);
        assert_eq!(Severity::from_score(55), Severity::Urgent);
        assert_eq!(Severity::from_score(84), Severity::Urgent);
        assert_eq!(Severity::from_score(85), Severity::Critical);
        assert_eq!(Severity::from_score(100), Severity::Critical);
    }

    #[test]
    fn outcome_kind_round_trip() {
        for (variant, s) in [
            (OutcomeKind::NoEmergency, "no_emergency"),
            (OutcomeKind::CriticalEscalated, "critical_escalated"),
            (OutcomeKind::HospitalAlerted, "hospital_alerted"),
            (OutcomeKind::NoHospitalAvailable, "no_hospital_available"),
            (OutcomeKind::NoHospitalReached, "no_hospital_reached"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(OutcomeKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&TriggerKind::VoiceAndSensor).unwrap();
        assert_eq!(json, "\"voice_and_sensor\"");
        let parsed: NotificationKind = serde_json::from_str("\"emergency_services\"").unwrap();
        assert_eq!(parsed, NotificationKind::EmergencyServices);
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = HospitalStatus::from_str("closed").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
