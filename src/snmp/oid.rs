use snmp2::Oid;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid OID \"{oid}\": {reason}")]
pub struct InvalidOid {
    pub oid: String,
    pub reason: String,
}

/// Парсит OID вида `1.3.6.1.2.1.33.1.2.3.0`. Ведущая точка допускается.
pub fn parse_oid(s: &str) -> Result<Oid<'static>, InvalidOid> {
    let invalid = |reason: String| InvalidOid {
        oid: s.to_string(),
        reason,
    };

    let parts = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect::<Result<Vec<u64>, _>>()
        .map_err(|e| invalid(e.to_string()))?;

    if parts.len() < 2 {
        return Err(invalid("at least two arcs are required".to_string()));
    }

    Oid::from(&parts).map_err(|e| invalid(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_notation() {
        let oid = parse_oid(".1.3.6.1.2.1.33.1.2.3.0").unwrap();
        assert_eq!(oid, parse_oid("1.3.6.1.2.1.33.1.2.3.0").unwrap());
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.33.1.2.3.0");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_oid("1.3.six.1").is_err());
        assert!(parse_oid("").is_err());
        assert!(parse_oid("1").is_err());
    }
}
