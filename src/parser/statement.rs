//! Typed statement records decoded from the engine's output buffer.
//!
//! Record layout (all fields little-endian `i32`):
//!
//! ```text
//! [0..4)   id
//! [4..8)   kind discriminant
//! [8..)    payload, shape depends on kind
//! ```
//!
//! Name-bearing payloads hold string views into the input buffer; their
//! offsets are reported relative to the start of that buffer.

use crate::base::memory::{self, DecodeError, STRING_VIEW_SIZE, SourceSpan};

/// Bytes reserved for the engine's statement record (header plus the largest payload).
pub const STATEMENT_RECORD_SIZE: u32 = 64;

const PAYLOAD_OFFSET: u32 = 8;

/// Closed set of statement kinds the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    None,
    Unknown,
    Package,
    Import,
    Component,
    Transient,
    System,
    Action,
    Enum,
    EnumValue,
    BuiltinTypeField,
    UserTypeField,
    EntityField,
    SystemComponent,
    SystemGenerates,
    SystemWithEntity,
    EntityConstraint,
}

impl StatementKind {
    pub const ALL: [StatementKind; 17] = [
        StatementKind::None,
        StatementKind::Unknown,
        StatementKind::Package,
        StatementKind::Import,
        StatementKind::Component,
        StatementKind::Transient,
        StatementKind::System,
        StatementKind::Action,
        StatementKind::Enum,
        StatementKind::EnumValue,
        StatementKind::BuiltinTypeField,
        StatementKind::UserTypeField,
        StatementKind::EntityField,
        StatementKind::SystemComponent,
        StatementKind::SystemGenerates,
        StatementKind::SystemWithEntity,
        StatementKind::EntityConstraint,
    ];

    /// Map a raw discriminant. Out-of-range values become [`StatementKind::Unknown`].
    pub fn from_raw(raw: i32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(StatementKind::Unknown)
    }

    pub fn to_raw(self) -> i32 {
        self as i32
    }

    /// Keyword that introduces a declaration of this kind, if any.
    pub fn declaration_keyword(self) -> Option<&'static str> {
        match self {
            StatementKind::Package => Some("package"),
            StatementKind::Import => Some("import"),
            StatementKind::Component => Some("component"),
            StatementKind::Transient => Some("transient"),
            StatementKind::System => Some("system"),
            StatementKind::Action => Some("action"),
            StatementKind::Enum => Some("enum"),
            _ => None,
        }
    }
}

/// Primitive field types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    Entity,
}

impl BuiltinType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => BuiltinType::Bool,
            1 => BuiltinType::I8,
            2 => BuiltinType::U8,
            3 => BuiltinType::I16,
            4 => BuiltinType::U16,
            5 => BuiltinType::I32,
            6 => BuiltinType::U32,
            7 => BuiltinType::F32,
            8 => BuiltinType::Entity,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::I8 => "i8",
            BuiltinType::U8 => "u8",
            BuiltinType::I16 => "i16",
            BuiltinType::U16 => "u16",
            BuiltinType::I32 => "i32",
            BuiltinType::U32 => "u32",
            BuiltinType::F32 => "f32",
            BuiltinType::Entity => "entity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStatement {
    pub main: bool,
    pub package_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub import_package_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStatement {
    pub component_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientStatement {
    pub transient_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatement {
    pub system_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStatement {
    pub action_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumStatement {
    pub enum_name: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueStatement {
    pub name: SourceSpan,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinTypeFieldStatement {
    /// `None` when the engine reports a type this crate does not know.
    pub field_type: Option<BuiltinType>,
    pub field_name: SourceSpan,
    /// Array length, `0` for scalar fields.
    pub length: i32,
}

/// Kind-specific statement payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementData {
    None,
    Unknown,
    Package(PackageStatement),
    Import(ImportStatement),
    Component(ComponentStatement),
    Transient(TransientStatement),
    System(SystemStatement),
    Action(ActionStatement),
    Enum(EnumStatement),
    EnumValue(EnumValueStatement),
    BuiltinTypeField(BuiltinTypeFieldStatement),
    UserTypeField,
    EntityField,
    SystemComponent,
    SystemGenerates,
    SystemWithEntity,
    EntityConstraint,
}

impl StatementData {
    pub fn kind(&self) -> StatementKind {
        match self {
            StatementData::None => StatementKind::None,
            StatementData::Unknown => StatementKind::Unknown,
            StatementData::Package(_) => StatementKind::Package,
            StatementData::Import(_) => StatementKind::Import,
            StatementData::Component(_) => StatementKind::Component,
            StatementData::Transient(_) => StatementKind::Transient,
            StatementData::System(_) => StatementKind::System,
            StatementData::Action(_) => StatementKind::Action,
            StatementData::Enum(_) => StatementKind::Enum,
            StatementData::EnumValue(_) => StatementKind::EnumValue,
            StatementData::BuiltinTypeField(_) => StatementKind::BuiltinTypeField,
            StatementData::UserTypeField => StatementKind::UserTypeField,
            StatementData::EntityField => StatementKind::EntityField,
            StatementData::SystemComponent => StatementKind::SystemComponent,
            StatementData::SystemGenerates => StatementKind::SystemGenerates,
            StatementData::SystemWithEntity => StatementKind::SystemWithEntity,
            StatementData::EntityConstraint => StatementKind::EntityConstraint,
        }
    }

    /// The declared name carried by the payload, if any.
    pub fn name(&self) -> Option<&SourceSpan> {
        match self {
            StatementData::Package(s) => Some(&s.package_name),
            StatementData::Import(s) => Some(&s.import_package_name),
            StatementData::Component(s) => Some(&s.component_name),
            StatementData::Transient(s) => Some(&s.transient_name),
            StatementData::System(s) => Some(&s.system_name),
            StatementData::Action(s) => Some(&s.action_name),
            StatementData::Enum(s) => Some(&s.enum_name),
            StatementData::EnumValue(s) => Some(&s.name),
            StatementData::BuiltinTypeField(s) => Some(&s.field_name),
            _ => None,
        }
    }
}

/// One decoded statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Engine-assigned identifier, not interpreted here.
    pub id: i32,
    pub data: StatementData,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        self.data.kind()
    }
}

/// Decode the statement record at `offset`.
///
/// `base` is the address of the input buffer the engine parsed; string view
/// offsets are reported relative to it.
pub fn decode_statement(memory: &[u8], offset: u32, base: u32) -> Result<Statement, DecodeError> {
    let id = memory::read_i32(memory, offset)?;
    let kind = StatementKind::from_raw(memory::read_i32(memory, offset + 4)?);
    let payload = offset + PAYLOAD_OFFSET;
    let span = |at: u32| memory::read_string_span(memory, at, base);

    let data = match kind {
        StatementKind::None => StatementData::None,
        StatementKind::Unknown => StatementData::Unknown,
        StatementKind::Package => StatementData::Package(PackageStatement {
            main: memory::read_u8(memory, payload)? != 0,
            package_name: span(payload + 4)?,
        }),
        StatementKind::Import => StatementData::Import(ImportStatement {
            import_package_name: span(payload)?,
        }),
        StatementKind::Component => StatementData::Component(ComponentStatement {
            component_name: span(payload)?,
        }),
        StatementKind::Transient => StatementData::Transient(TransientStatement {
            transient_name: span(payload)?,
        }),
        StatementKind::System => StatementData::System(SystemStatement {
            system_name: span(payload)?,
        }),
        StatementKind::Action => StatementData::Action(ActionStatement {
            action_name: span(payload)?,
        }),
        StatementKind::Enum => StatementData::Enum(EnumStatement {
            enum_name: span(payload)?,
        }),
        StatementKind::EnumValue => StatementData::EnumValue(EnumValueStatement {
            name: span(payload)?,
            value: memory::read_i32(memory, payload + STRING_VIEW_SIZE)?,
        }),
        StatementKind::BuiltinTypeField => {
            StatementData::BuiltinTypeField(BuiltinTypeFieldStatement {
                field_type: BuiltinType::from_raw(memory::read_i32(memory, payload)?),
                field_name: span(payload + 4)?,
                length: memory::read_i32(memory, payload + 4 + STRING_VIEW_SIZE)?,
            })
        }
        StatementKind::UserTypeField => StatementData::UserTypeField,
        StatementKind::EntityField => StatementData::EntityField,
        StatementKind::SystemComponent => StatementData::SystemComponent,
        StatementKind::SystemGenerates => StatementData::SystemGenerates,
        StatementKind::SystemWithEntity => StatementData::SystemWithEntity,
        StatementKind::EntityConstraint => StatementData::EntityConstraint,
    };

    Ok(Statement { id, data })
}
