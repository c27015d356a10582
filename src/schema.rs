//! Kind taxonomy and attribute schemas
//!
//! Every concrete kind declares the attributes it accepts. Attributes are
//! inherited along the taxonomy: a `Service` accepts everything an
//! `Application` accepts, which in turn accepts every CyberObject attribute.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enumerations::Enumeration;

/// Semantic type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Boolean,
    Integer,
    Float,
    /// UTC instant, RFC 3339 on disk
    Timestamp,
    /// Millisecond-precision span, integer milliseconds on disk
    Duration,
    List,
    /// List whose elements must all be strings (typically ids)
    StringList,
    Mapping,
    Enum(Enumeration),
    EnumList(Enumeration),
}

impl AttributeType {
    /// Human readable description used in validation errors
    pub fn describe(&self) -> String {
        match self {
            AttributeType::String => "string".to_string(),
            AttributeType::Boolean => "boolean".to_string(),
            AttributeType::Integer => "integer".to_string(),
            AttributeType::Float => "float".to_string(),
            AttributeType::Timestamp => "timestamp".to_string(),
            AttributeType::Duration => "duration".to_string(),
            AttributeType::List => "list".to_string(),
            AttributeType::StringList => "list of strings".to_string(),
            AttributeType::Mapping => "mapping".to_string(),
            AttributeType::Enum(e) => format!("one of {}", e.name()),
            AttributeType::EnumList(e) => format!("list of {}", e.name()),
        }
    }
}

/// Declaration of a single attribute on a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub ty: AttributeType,
    pub required: bool,
}

// Struct literals keep the slices below promotable to 'static.
macro_rules! attr {
    ($name:literal, $ty:expr) => {
        AttributeSpec { name: $name, ty: $ty, required: false }
    };
}

macro_rules! required {
    ($name:literal, $ty:expr) => {
        AttributeSpec { name: $name, ty: $ty, required: true }
    };
}

use self::AttributeType as T;
use crate::enumerations::Enumeration as E;

const CYBER_OBJECT: &[AttributeSpec] = &[
    attr!("name", T::String),
    attr!("description", T::String),
    attr!("related_objects", T::StringList),
];

const CYBER_EVENT: &[AttributeSpec] = &[
    attr!("event_time", T::Timestamp),
    attr!("target_ids", T::StringList),
    attr!("target_modifiers", T::Mapping),
    attr!("phase", T::Enum(E::CyberEventPhaseType)),
    attr!("duration", T::Duration),
    attr!("actor_ids", T::StringList),
    attr!("source_ids", T::StringList),
];

const PERCENTAGE: &[AttributeSpec] = &[attr!("percentage", T::Float)];

/// Top-level branch of the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Object,
    Action,
    Effect,
    Relationship,
}

/// Concrete entity kind; also the name of its storage namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    // Objects
    Application,
    Data,
    Device,
    Network,
    NetworkInterface,
    NetworkLink,
    Persona,
    System,
    OperatingSystem,
    Service,
    // Actions
    CyberAttack,
    CyberDefend,
    CyberRecon,
    DataExfiltration,
    ManipulationAttack,
    PhishingAttack,
    // Effects
    Deny,
    Destroy,
    Degrade,
    Disrupt,
    Detect,
    Manipulate,
    HardwareDamageEffect,
    LoadRateEffect,
    DelayEffect,
    JitterEffect,
    #[serde(rename = "CPULoadEffect")]
    CpuLoadEffect,
    MemoryUseEffect,
    DropEffect,
    HardwareDegradeEffect,
    OtherDegradeEffect,
    BlockTrafficEffect,
    PacketManipulationEffect,
    // Edges
    Relationship,
}

impl Kind {
    /// The closed taxonomy, in declaration order
    pub const ALL: &'static [Kind] = &[
        Kind::Application,
        Kind::Data,
        Kind::Device,
        Kind::Network,
        Kind::NetworkInterface,
        Kind::NetworkLink,
        Kind::Persona,
        Kind::System,
        Kind::OperatingSystem,
        Kind::Service,
        Kind::CyberAttack,
        Kind::CyberDefend,
        Kind::CyberRecon,
        Kind::DataExfiltration,
        Kind::ManipulationAttack,
        Kind::PhishingAttack,
        Kind::Deny,
        Kind::Destroy,
        Kind::Degrade,
        Kind::Disrupt,
        Kind::Detect,
        Kind::Manipulate,
        Kind::HardwareDamageEffect,
        Kind::LoadRateEffect,
        Kind::DelayEffect,
        Kind::JitterEffect,
        Kind::CpuLoadEffect,
        Kind::MemoryUseEffect,
        Kind::DropEffect,
        Kind::HardwareDegradeEffect,
        Kind::OtherDegradeEffect,
        Kind::BlockTrafficEffect,
        Kind::PacketManipulationEffect,
        Kind::Relationship,
    ];

    /// Kind discriminator as written in records and namespace directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Application => "Application",
            Kind::Data => "Data",
            Kind::Device => "Device",
            Kind::Network => "Network",
            Kind::NetworkInterface => "NetworkInterface",
            Kind::NetworkLink => "NetworkLink",
            Kind::Persona => "Persona",
            Kind::System => "System",
            Kind::OperatingSystem => "OperatingSystem",
            Kind::Service => "Service",
            Kind::CyberAttack => "CyberAttack",
            Kind::CyberDefend => "CyberDefend",
            Kind::CyberRecon => "CyberRecon",
            Kind::DataExfiltration => "DataExfiltration",
            Kind::ManipulationAttack => "ManipulationAttack",
            Kind::PhishingAttack => "PhishingAttack",
            Kind::Deny => "Deny",
            Kind::Destroy => "Destroy",
            Kind::Degrade => "Degrade",
            Kind::Disrupt => "Disrupt",
            Kind::Detect => "Detect",
            Kind::Manipulate => "Manipulate",
            Kind::HardwareDamageEffect => "HardwareDamageEffect",
            Kind::LoadRateEffect => "LoadRateEffect",
            Kind::DelayEffect => "DelayEffect",
            Kind::JitterEffect => "JitterEffect",
            Kind::CpuLoadEffect => "CPULoadEffect",
            Kind::MemoryUseEffect => "MemoryUseEffect",
            Kind::DropEffect => "DropEffect",
            Kind::HardwareDegradeEffect => "HardwareDegradeEffect",
            Kind::OtherDegradeEffect => "OtherDegradeEffect",
            Kind::BlockTrafficEffect => "BlockTrafficEffect",
            Kind::PacketManipulationEffect => "PacketManipulationEffect",
            Kind::Relationship => "Relationship",
        }
    }

    /// Which branch of the taxonomy this kind belongs to
    pub fn branch(&self) -> Branch {
        match self {
            Kind::Application
            | Kind::Data
            | Kind::Device
            | Kind::Network
            | Kind::NetworkInterface
            | Kind::NetworkLink
            | Kind::Persona
            | Kind::System
            | Kind::OperatingSystem
            | Kind::Service => Branch::Object,
            Kind::CyberAttack
            | Kind::CyberDefend
            | Kind::CyberRecon
            | Kind::DataExfiltration
            | Kind::ManipulationAttack
            | Kind::PhishingAttack => Branch::Action,
            Kind::Relationship => Branch::Relationship,
            _ => Branch::Effect,
        }
    }

    /// Concrete parent kind, if this kind specialises another one
    pub fn parent(&self) -> Option<Kind> {
        match self {
            Kind::Service => Some(Kind::Application),
            Kind::DataExfiltration | Kind::ManipulationAttack | Kind::PhishingAttack => {
                Some(Kind::CyberAttack)
            }
            Kind::Destroy | Kind::Degrade | Kind::Disrupt => Some(Kind::Deny),
            Kind::HardwareDamageEffect => Some(Kind::Destroy),
            Kind::LoadRateEffect
            | Kind::DelayEffect
            | Kind::JitterEffect
            | Kind::CpuLoadEffect
            | Kind::MemoryUseEffect
            | Kind::DropEffect
            | Kind::HardwareDegradeEffect
            | Kind::OtherDegradeEffect => Some(Kind::Degrade),
            Kind::BlockTrafficEffect => Some(Kind::Disrupt),
            Kind::PacketManipulationEffect => Some(Kind::Manipulate),
            _ => None,
        }
    }

    /// Literal prefix carried by ids of this kind before the UUID
    pub fn id_prefix(&self) -> Option<&'static str> {
        match self {
            Kind::Relationship => Some("relationship--"),
            _ => None,
        }
    }

    fn base_attributes(&self) -> &'static [AttributeSpec] {
        match self.branch() {
            Branch::Object => CYBER_OBJECT,
            Branch::Action | Branch::Effect => CYBER_EVENT,
            Branch::Relationship => &[],
        }
    }

    /// Attributes introduced by this kind itself (not inherited)
    pub fn own_attributes(&self) -> &'static [AttributeSpec] {
        match self {
            Kind::Application => &[attr!("version", T::String)],
            Kind::Data => &[
                attr!("sensitivity", T::Enum(E::SensitivityType)),
                attr!("data_type", T::Enum(E::DataType)),
                attr!("encrypted", T::Enum(E::EncryptionType)),
                attr!("status", T::Enum(E::DataStatusType)),
                attr!("confidentiality", T::Float),
            ],
            Kind::Device => &[
                attr!("device_types", T::EnumList(E::DeviceType)),
                attr!("is_virtual", T::Boolean),
                attr!("role", T::String),
                attr!("device_identifier", T::String),
                attr!("network_interfaces", T::List),
            ],
            Kind::Network => &[
                attr!("protocol", T::Enum(E::NetworkProtocolType)),
                attr!("mask", T::String),
            ],
            Kind::NetworkInterface => &[attr!("address", T::String)],
            Kind::NetworkLink => &[
                attr!("is_logical", T::Boolean),
                attr!("physical_layer", T::Enum(E::PhysicalLayerType)),
                attr!("data_link_protocol", T::Enum(E::DataLinkProtocolType)),
                attr!("bandwidth", T::Integer),
                attr!("latency", T::Integer),
                attr!("jitter", T::Integer),
                attr!("network_interfaces", T::List),
            ],
            Kind::System => &[attr!("system_type", T::Enum(E::SystemType))],
            Kind::OperatingSystem => &[attr!("os_type", T::Enum(E::OperatingSystemType))],
            Kind::Service => &[
                attr!("service_type", T::Enum(E::ServiceType)),
                attr!("address", T::String),
            ],
            Kind::CyberRecon => &[attr!("recon_type", T::Enum(E::ReconType))],
            Kind::ManipulationAttack => &[
                attr!("description", T::String),
                attr!("attack_content", T::String),
            ],
            Kind::PhishingAttack => &[
                attr!("message_type", T::Enum(E::MessageType)),
                attr!("header", T::String),
                attr!("body", T::String),
            ],
            Kind::Disrupt => &[attr!("is_random", T::Boolean), attr!("percentage", T::Float)],
            Kind::Detect => &[attr!("acquired_information", T::Mapping)],
            Kind::Manipulate => &[attr!("description", T::String)],
            Kind::HardwareDamageEffect => &[attr!("damage_type", T::Enum(E::HardwareDamageType))],
            Kind::LoadRateEffect => &[
                attr!("percentage", T::Float),
                attr!("rate_type", T::Enum(E::LoadRateType)),
            ],
            Kind::DelayEffect => &[attr!("seconds", T::Float)],
            Kind::JitterEffect => &[attr!("milliseconds", T::Float)],
            Kind::CpuLoadEffect | Kind::MemoryUseEffect | Kind::DropEffect => PERCENTAGE,
            Kind::HardwareDegradeEffect => &[
                attr!("degrade_type", T::Enum(E::HardwareDegradeType)),
                attr!("percentage", T::Float),
            ],
            Kind::OtherDegradeEffect => &[
                attr!("percentage", T::Float),
                attr!("description", T::String),
            ],
            Kind::PacketManipulationEffect => &[
                attr!("manipulation_type", T::Enum(E::PacketManipulationType)),
                attr!("attack_content", T::String),
                attr!("percentage", T::Float),
            ],
            Kind::Relationship => &[
                required!("subject_id", T::String),
                required!("relationship_type", T::Enum(E::RelationshipType)),
                required!("object_id", T::String),
                attr!("privileges", T::StringList),
            ],
            Kind::Persona
            | Kind::CyberAttack
            | Kind::CyberDefend
            | Kind::DataExfiltration
            | Kind::Deny
            | Kind::Destroy
            | Kind::Degrade
            | Kind::BlockTrafficEffect => &[],
        }
    }

    /// Every attribute this kind accepts, excluding `id`: branch attributes first,
    /// then each ancestor's own attributes from the root down to this kind.
    pub fn declared_attributes(&self) -> Vec<&'static AttributeSpec> {
        let mut chain = vec![*self];
        let mut current = *self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }

        let mut attributes: Vec<&'static AttributeSpec> = self.base_attributes().iter().collect();
        for kind in chain.iter().rev() {
            for spec in kind.own_attributes() {
                if !attributes.iter().any(|a| a.name == spec.name) {
                    attributes.push(spec);
                }
            }
        }
        attributes
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
