use std::fmt;

use snmp2::{Oid, Pdu, Value};

/// Собственная копия SNMP переменной.
///
/// Значения `snmp2` ссылаются на буфер приёма сессии, поэтому их копируем
/// до следующего запроса.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Integer(i64),
    OctetString(Vec<u8>),
    ObjectIdentifier(String),
    IpAddress([u8; 4]),
    Counter32(u32),
    Unsigned32(u32),
    Timeticks(u32),
    Opaque(Vec<u8>),
    Counter64(u64),
    Null,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    Unsupported,
}

impl Variable {
    /// SMI имя типа, для сообщений об ошибках.
    pub fn type_name(&self) -> &'static str {
        match self {
            Variable::Integer(_) => "INTEGER",
            Variable::OctetString(_) => "OCTET STRING",
            Variable::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Variable::IpAddress(_) => "IpAddress",
            Variable::Counter32(_) => "Counter32",
            Variable::Unsigned32(_) => "Gauge32",
            Variable::Timeticks(_) => "TimeTicks",
            Variable::Opaque(_) => "Opaque",
            Variable::Counter64(_) => "Counter64",
            Variable::Null => "NULL",
            Variable::NoSuchObject => "noSuchObject",
            Variable::NoSuchInstance => "noSuchInstance",
            Variable::EndOfMibView => "endOfMibView",
            Variable::Unsupported => "unsupported",
        }
    }
}

impl From<&Value<'_>> for Variable {
    fn from(value: &Value<'_>) -> Self {
        match value {
            Value::Integer(i) => Variable::Integer(*i),
            Value::OctetString(bytes) => Variable::OctetString(bytes.to_vec()),
            Value::ObjectIdentifier(oid) => Variable::ObjectIdentifier(oid.to_string()),
            Value::IpAddress(addr) => Variable::IpAddress(*addr),
            Value::Counter32(v) => Variable::Counter32(*v),
            Value::Unsigned32(v) => Variable::Unsigned32(*v),
            Value::Timeticks(v) => Variable::Timeticks(*v),
            Value::Opaque(bytes) => Variable::Opaque(bytes.to_vec()),
            Value::Counter64(v) => Variable::Counter64(*v),
            Value::Null => Variable::Null,
            Value::NoSuchObject => Variable::NoSuchObject,
            Value::NoSuchInstance => Variable::NoSuchInstance,
            Value::EndOfMibView => Variable::EndOfMibView,
            _ => Variable::Unsupported,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Integer(i) => write!(f, "{}", i),
            Variable::OctetString(bytes) | Variable::Opaque(bytes) => {
                write!(f, "{:?}", String::from_utf8_lossy(bytes))
            }
            Variable::ObjectIdentifier(oid) => f.write_str(oid),
            Variable::IpAddress([a, b, c, d]) => write!(f, "{}.{}.{}.{}", a, b, c, d),
            Variable::Counter32(v) | Variable::Unsigned32(v) | Variable::Timeticks(v) => {
                write!(f, "{}", v)
            }
            Variable::Counter64(v) => write!(f, "{}", v),
            other => f.write_str(other.type_name()),
        }
    }
}

/// Ответ на get: статус ошибки и полученные привязки по порядку.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub error_status: u32,
    pub error_index: u32,
    pub bindings: Vec<(Oid<'static>, Variable)>,
}

impl Response {
    pub fn from_pdu(pdu: Pdu<'_>) -> Self {
        let error_status = pdu.error_status;
        let error_index = pdu.error_index;
        let bindings = pdu
            .varbinds
            .into_iter()
            .map(|(oid, value)| (oid.to_owned(), Variable::from(&value)))
            .collect();

        Self {
            error_status,
            error_index,
            bindings,
        }
    }

    /// Ищет привязку для `oid`.
    pub fn binding(&self, oid: &Oid<'_>) -> Option<&Variable> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == oid)
            .map(|(_, variable)| variable)
    }
}

/// Имена error-status по RFC 3416.
pub fn error_status_name(status: u32) -> &'static str {
    match status {
        0 => "noError",
        1 => "tooBig",
        2 => "noSuchName",
        3 => "badValue",
        4 => "readOnly",
        5 => "genErr",
        6 => "noAccess",
        7 => "wrongType",
        8 => "wrongLength",
        9 => "wrongEncoding",
        10 => "wrongValue",
        11 => "noCreation",
        12 => "inconsistentValue",
        13 => "resourceUnavailable",
        14 => "commitFailed",
        15 => "undoFailed",
        16 => "authorizationError",
        17 => "notWritable",
        18 => "inconsistentName",
        _ => "unknownError",
    }
}
