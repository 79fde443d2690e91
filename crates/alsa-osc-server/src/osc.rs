//! OSC argument and packet conversion

use alsa_osc_core::Value;
use rosc::{OscMessage, OscPacket, OscType};

/// Convert a single OSC argument to a [`Value`]
pub fn osc_type_to_value(osc: &OscType) -> Value {
    match osc {
        OscType::Int(i) => Value::Int(*i as i64),
        OscType::Long(l) => Value::Int(*l),
        OscType::Float(f) => Value::Float(*f as f64),
        OscType::Double(d) => Value::Float(*d),
        OscType::Bool(b) => Value::Bool(*b),
        OscType::String(s) => Value::String(s.clone()),
        OscType::Blob(b) => Value::Bytes(b.clone()),
        OscType::Nil => Value::Nil,
        OscType::Inf => Value::Float(f64::INFINITY),
        OscType::Time(_) => Value::Other("timetag"),
        OscType::Char(_) => Value::Other("char"),
        OscType::Color(_) => Value::Other("color"),
        OscType::Midi(_) => Value::Other("midi"),
        OscType::Array(_) => Value::Other("array"),
    }
}

pub fn osc_args_to_values(args: &[OscType]) -> Vec<Value> {
    args.iter().map(osc_type_to_value).collect()
}

/// Convert a [`Value`] back to an OSC argument
pub fn value_to_osc_type(value: &Value) -> Option<OscType> {
    match value {
        Value::Nil => Some(OscType::Nil),
        Value::Bool(b) => Some(OscType::Bool(*b)),
        Value::Int(i) => {
            if *i >= i32::MIN as i64 && *i <= i32::MAX as i64 {
                Some(OscType::Int(*i as i32))
            } else {
                Some(OscType::Long(*i))
            }
        }
        Value::Float(f) => Some(OscType::Float(*f as f32)),
        Value::String(s) => Some(OscType::String(s.clone())),
        Value::Bytes(b) => Some(OscType::Blob(b.clone())),
        Value::Other(_) => None,
    }
}

/// Flatten a packet into its messages, depth first. Bundle time tags are
/// ignored; every message is delivered immediately.
pub fn packet_messages(packet: OscPacket) -> Vec<OscMessage> {
    let mut messages = Vec::new();
    collect(packet, &mut messages);
    messages
}

fn collect(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                collect(inner, out);
            }
        }
    }
}

/// Parse a command-line style value: `true`/`false`, integers, then floats,
/// falling back to a string
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" | "True" => return Value::Bool(true),
        "false" | "False" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(i) = s.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscBundle, OscTime};

    #[test]
    fn test_osc_type_to_value() {
        assert_eq!(osc_type_to_value(&OscType::Int(42)), Value::Int(42));
        assert_eq!(osc_type_to_value(&OscType::Float(0.5)), Value::Float(0.5));
        assert_eq!(osc_type_to_value(&OscType::Double(-18.0)), Value::Float(-18.0));
        assert_eq!(osc_type_to_value(&OscType::Bool(true)), Value::Bool(true));
        assert_eq!(osc_type_to_value(&OscType::Char('x')), Value::Other("char"));
    }

    #[test]
    fn test_value_to_osc_type() {
        assert!(matches!(value_to_osc_type(&Value::Int(1)), Some(OscType::Int(1))));
        assert!(matches!(
            value_to_osc_type(&Value::Int(1 << 40)),
            Some(OscType::Long(_))
        ));
        assert!(matches!(
            value_to_osc_type(&Value::Float(0.75)),
            Some(OscType::Float(f)) if (f - 0.75).abs() < 0.001
        ));
        assert!(value_to_osc_type(&Value::Other("midi")).is_none());
    }

    #[test]
    fn test_nested_bundle_flattening() {
        let msg = |addr: &str| {
            OscPacket::Message(OscMessage {
                addr: addr.to_string(),
                args: vec![],
            })
        };
        let inner = OscPacket::Bundle(OscBundle {
            timetag: OscTime::from((0, 1)),
            content: vec![msg("/b"), msg("/c")],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: OscTime::from((0, 1)),
            content: vec![msg("/a"), inner, msg("/d")],
        });

        let addrs: Vec<String> = packet_messages(outer).into_iter().map(|m| m.addr).collect();
        assert_eq!(addrs, vec!["/a", "/b", "/c", "/d"]);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("False"), Value::Bool(false));
        assert_eq!(parse_value("1"), Value::Int(1));
        assert_eq!(parse_value("0.86"), Value::Float(0.86));
        assert_eq!(parse_value("-18.0"), Value::Float(-18.0));
        assert_eq!(parse_value("loud"), Value::from("loud"));
    }
}
