//! Closed option sets for enumeration-valued attributes
//!
//! Values are matched case-insensitively. A value whose casing differs from the
//! canonical option is accepted and reported as a [`CaseDiagnostic`] so callers
//! can log, ignore or reject it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! enumerations {
    ($($name:ident => [$($opt:literal),+ $(,)?]),+ $(,)?) => {
        /// A named, closed set of allowed string values
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Enumeration {
            $($name),+
        }

        impl Enumeration {
            /// Every enumeration known to the model
            pub const ALL: &'static [Enumeration] = &[$(Enumeration::$name),+];

            /// Name of the enumeration (e.g., "DeviceType")
            pub fn name(&self) -> &'static str {
                match self {
                    $(Enumeration::$name => stringify!($name)),+
                }
            }

            /// Canonical options, in declaration order
            pub fn options(&self) -> &'static [&'static str] {
                match self {
                    $(Enumeration::$name => &[$($opt),+]),+
                }
            }
        }
    };
}

enumerations! {
    AcknowledgeResponseType => ["AbleToComply", "UnableToComply"],
    AdminType => [
        "Administration", "Assessment", "Collection", "Configuration", "Evaluation",
        "Forensics", "Investigation", "Operations", "Provisioning", "Testing",
    ],
    CyberEventPhaseType => ["Start", "Suspend", "Continue", "ContinueWithChanges", "End", "Cancel"],
    DataLinkProtocolType => [
        "Ethernet", "WiFi", "ATM", "LocalTalk", "PPP", "TokenRing", "VLAN", "Bluetooth", "1553Bus",
    ],
    DataStatusType => ["Intact", "Compromised", "Corrupted", "Manipulated", "NonDecryptable", "Erased"],
    DataType => ["File", "Code", "Credentials", "Communications", "SystemConfiguration"],
    DeviceType => [
        "Generic", "Networking", "ComputerNode", "PortableComputer", "Controller", "Storage",
        "Sensor", "Printer", "Scanner", "Communications", "HMI", "Monitoring", "IoT", "Security",
    ],
    EncryptionType => ["NotEncrypted", "DES", "TripleDES", "RSA", "AES", "TwoFish", "SHA"],
    HardwareDamageType => ["BootLoop", "PhysicalDestruction", "HardDriveErased"],
    HardwareDegradeType => ["Keyboard", "Mouse", "Display", "Sound"],
    LoadRateType => ["Upload", "Download"],
    ManipulationType => ["Packet", "File", "Database"],
    MessageType => ["Email", "Chat", "Text", "SocialMedia"],
    NetworkProtocolType => ["InternetProtocol", "NAT", "ICMP", "ARP", "RIP", "OSPF", "IPsec"],
    OperatingSystemType => [
        "MicrosoftDOS", "MicrosoftWindows", "AppleMacOS", "DECVMS", "IBMOS 2", "Android",
        "AppleiOS", "CiscoIOS", "Firmware", "UNIX-Linux",
    ],
    PacketManipulationType => ["Duplication", "Corruption", "Redordering", "Dropped"],
    PhysicalLayerType => ["Wired", "Wireless"],
    ReconType => [
        "AccountDiscovery", "AdMalware", "AntivirusTrojan", "ApplicationWindowDiscovery",
        "ARPScan", "BannerGrabbing", "BounceScan", "BrowserBookmarkDiscovery",
        "CloudInfrastructureDiscovery", "CloudServiceDashboard", "CloudServiceDiscovery",
        "Compliance", "CSRF", "DatabaseInjection", "DatabaseStructure", "DBManufactureVersion",
        "Device", "DNS", "Domain", "DomainTrustDiscovery", "FileAndDirectoryDiscovery",
        "FINScan", "FTP", "HTTP", "IdleScan", "IGMP", "InputValidation", "IP", "LDAPScan",
        "NetBiosScan", "NetworkMap", "NetworkServiceScanning", "NetworkShareDiscovery",
        "NetworkSniffing", "NTP", "NULLScan", "OSScan", "PasswordPolicyDiscovery",
        "PatchHistory", "PeripheralDeviceDiscovery", "PermissionGroupsDiscovery", "Ping",
        "PingScan", "PortScan", "PortSweep", "PPP", "ProcessDiscovery", "QueryRegistry", "RARP",
        "Remote SystemDiscovery", "Rootkit", "RPCScan", "Service", "SLIP", "SMTP", "SNMPSweep",
        "SoftwareDiscover", "SYNScan", "SystemlnformationDiscovery",
        "SystemNetworkConfigurationDiscovery", "SystemNetworkConnectionsDiscovery",
        "SystemOwnerUserDiscovery", "SystemServiceDiscovery", "SystemTimeDiscovery",
        "TCPConnect", "TraceRoute", "UNIX-Linux", "VirtualizationSandboxEvasion",
        "Vulnerability", "WebCrawler", "Windows", "WirelessActive", "WirelessPassive",
        "XMASScan", "XSS",
    ],
    RelationshipType => [
        "Administers", "AdministeredBy", "ComponentOf", "HasComponent", "ContainedIn",
        "Contains", "ProvidedBy", "Provides", "ResidesOn", "HasResident",
    ],
    SensitivityType => [
        "Unclassified", "Confidential", "FOUO", "Secret", "SecretNoForn", "TS", "TS_SCI",
        "NATORestricted", "NATOConfidential", "NATOSecret", "CosmicTopSecret",
        "FVEYProprietary", "Proprietary", "PII", "HIPAA", "GDPR", "Public",
    ],
    ServiceType => [
        "DNS", "Email", "Web", "Database", "File", "Chat", "Forum", "SocialMedia",
        "Containerization", "Virtualization", "NetworkTime",
    ],
    SystemType => ["Generic", "SCADA", "C2", "ICS"],
}

/// Non-fatal report that a value matched an option with different casing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDiagnostic {
    pub enumeration: &'static str,
    pub given: String,
    pub canonical: &'static str,
}

impl fmt::Display for CaseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" is not the same capitalization as {} option \"{}\"",
            self.given, self.enumeration, self.canonical
        )
    }
}

impl Enumeration {
    /// Find the canonical option matching `value` case-insensitively
    pub fn canonical(&self, value: &str) -> Option<&'static str> {
        self.options()
            .iter()
            .copied()
            .find(|opt| opt.eq_ignore_ascii_case(value))
    }

    /// Check a single value of `attribute` against the option set
    pub fn check(
        &self,
        attribute: &str,
        value: &str,
    ) -> Result<Option<CaseDiagnostic>, ValidationError> {
        match self.canonical(value) {
            Some(canonical) if canonical == value => Ok(None),
            Some(canonical) => Ok(Some(CaseDiagnostic {
                enumeration: self.name(),
                given: value.to_string(),
                canonical,
            })),
            None => Err(ValidationError::InvalidEnumValue {
                attribute: attribute.to_string(),
                enumeration: self.name(),
                value: value.to_string(),
                options: self.options().to_vec(),
            }),
        }
    }

    /// Check every element of a list independently; the first bad element fails the list
    pub fn check_all<S: AsRef<str>>(
        &self,
        attribute: &str,
        values: &[S],
    ) -> Result<Vec<CaseDiagnostic>, ValidationError> {
        let mut diagnostics = Vec::new();
        for value in values {
            if let Some(diag) = self.check(attribute, value.as_ref())? {
                diagnostics.push(diag);
            }
        }
        Ok(diagnostics)
    }
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_option_passes_exact_and_folded() {
        for enumeration in Enumeration::ALL {
            for opt in enumeration.options() {
                assert_eq!(enumeration.check("field", opt).unwrap(), None);

                let upper = opt.to_uppercase();
                let lower = opt.to_lowercase();
                for folded in [upper, lower] {
                    let diag = enumeration.check("field", &folded).unwrap();
                    if folded == *opt {
                        assert!(diag.is_none());
                    } else {
                        let diag = diag.expect("casing mismatch should be reported");
                        assert_eq!(diag.canonical, *opt);
                    }
                }
            }
        }
    }

    #[test]
    fn test_unknown_value_lists_options() {
        let err = Enumeration::SystemType.check("system_type", "Mainframe").unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { attribute, enumeration, options, .. } => {
                assert_eq!(attribute, "system_type");
                assert_eq!(enumeration, "SystemType");
                assert_eq!(options, vec!["Generic", "SCADA", "C2", "ICS"]);
            }
            other => panic!("Expected InvalidEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn test_check_all_validates_each_element() {
        let diags = Enumeration::DeviceType
            .check_all("device_types", &["Sensor", "hmi", "IoT"])
            .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].canonical, "HMI");

        assert!(Enumeration::DeviceType
            .check_all("device_types", &["Sensor", "Toaster"])
            .is_err());
    }

    #[test]
    fn test_options_with_spaces() {
        assert_eq!(Enumeration::OperatingSystemType.canonical("ibmos 2"), Some("IBMOS 2"));
        assert_eq!(Enumeration::ReconType.canonical("remote systemdiscovery"), Some("Remote SystemDiscovery"));
    }
}
