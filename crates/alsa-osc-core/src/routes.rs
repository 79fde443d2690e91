//! Address-to-control routing table
//!
//! The table is built once from a [`Snapshot`] and never mutated afterwards,
//! so it can be shared between any number of dispatching tasks without
//! locking.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::address::{Root, RouteKind};
use crate::traits::Actuator;
use crate::types::{
    CardInfo, ChannelSelector, ControlDescriptor, ControlTarget, Level, Snapshot, Units, ValueRange,
};
use crate::value::Value;
use crate::{Error, Result};

/// Operation a route performs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RouteOp {
    SetVolume {
        channel: ChannelSelector,
        units: Units,
        /// dB values are clamped into this range
        #[serde(skip)]
        db_range: ValueRange,
    },
    SetMute,
    SetRecord,
}

/// Everything needed to apply one inbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEntry {
    #[serde(flatten)]
    pub target: ControlTarget,
    #[serde(flatten)]
    pub op: RouteOp,
}

impl RouteEntry {
    pub fn new(target: ControlTarget, op: RouteOp) -> Self {
        Self { target, op }
    }

    pub fn kind(&self) -> RouteKind {
        match self.op {
            RouteOp::SetVolume { channel, units, .. } => RouteKind::volume(units, channel),
            RouteOp::SetMute => RouteKind::Mute,
            RouteOp::SetRecord => RouteKind::Record,
        }
    }

    /// Apply the message arguments through the actuator.
    ///
    /// Exactly one actuator call is made when the arguments are valid; none
    /// when they are not. Actuator errors are returned unchanged.
    pub fn apply<A: Actuator + ?Sized>(&self, args: &[Value], actuator: &A) -> Result<()> {
        let arg = single_arg(args)?;

        match self.op {
            RouteOp::SetVolume {
                channel,
                units,
                db_range,
            } => {
                let value = arg.as_f64().ok_or_else(|| {
                    Error::InvalidArgument(format!("volume expects a number, got {}", arg.type_name()))
                })?;
                let level = match units {
                    Units::Percent => percent_level(value)?,
                    Units::Decibel => decibel_level(value, db_range)?,
                };
                debug!("{} {} <- {}", self.target, channel, level);
                actuator.set_volume(&self.target, channel, level)
            }
            RouteOp::SetMute => {
                let mute = switch_arg(arg, "mute")?;
                debug!("{} mute <- {}", self.target, mute);
                actuator.set_mute(&self.target, mute)
            }
            RouteOp::SetRecord => {
                let armed = switch_arg(arg, "rec")?;
                debug!("{} rec <- {}", self.target, armed);
                actuator.set_record(&self.target, armed)
            }
        }
    }
}

fn single_arg(args: &[Value]) -> Result<&Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(Error::InvalidArgument(format!(
            "expected 1 argument, got {}",
            args.len()
        ))),
    }
}

fn switch_arg(arg: &Value, name: &str) -> Result<bool> {
    arg.as_bool().ok_or_else(|| {
        Error::InvalidArgument(format!("{} expects a boolean, got {}", name, arg.type_name()))
    })
}

/// Fraction in [0, 1] to an integer percentage, clamping out-of-range input
fn percent_level(value: f64) -> Result<Level> {
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!("volume must be finite, got {}", value)));
    }

    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        debug!("Volume {} clamped to {}", value, clamped);
    }

    Ok(Level::Percent((clamped * 100.0).round() as u8))
}

/// dB value, clamped into the control's reported dB range
fn decibel_level(value: f64, range: ValueRange) -> Result<Level> {
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!("dB value must be finite, got {}", value)));
    }

    let clamped = range.clamp(value);
    if clamped != value {
        debug!("{} dB clamped to {} dB ({})", value, clamped, range);
    }

    Ok(Level::Decibel(clamped))
}

/// One address and the entry it routes to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub address: String,
    #[serde(flatten)]
    pub entry: RouteEntry,
}

/// Every route for one control, in announcement order
pub fn control_routes(root: &Root, card: &CardInfo, control: &ControlDescriptor) -> Vec<Route> {
    let target = control.target();
    let mut routes = Vec::with_capacity(control_route_count(control));

    let mut push = |op: RouteOp| {
        let entry = RouteEntry::new(target.clone(), op);
        routes.push(Route {
            address: root.address(&card.name, &control.name, entry.kind()),
            entry,
        });
    };

    for units in [Units::Percent, Units::Decibel] {
        let volume = |channel| RouteOp::SetVolume {
            channel,
            units,
            db_range: control.db_range,
        };

        push(volume(ChannelSelector::All));
        if control.channels > 1 {
            for n in 0..control.channels {
                push(volume(ChannelSelector::Channel(n)));
            }
        }
    }

    if control.can_mute {
        push(RouteOp::SetMute);
    }
    if control.can_record {
        push(RouteOp::SetRecord);
    }

    routes
}

/// Number of routes [`control_routes`] generates
pub fn control_route_count(control: &ControlDescriptor) -> usize {
    let per_channel = if control.channels > 1 {
        control.channels as usize
    } else {
        0
    };

    2 + 2 * per_channel + control.can_mute as usize + control.can_record as usize
}

/// Immutable address-to-entry mapping
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteTable {
    root: Root,
    routes: Vec<Route>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Build routes for every control in the snapshot.
    ///
    /// Addresses are unique as long as control names are unique per card.
    /// If two cards share a display name and collide, the route registered
    /// first is kept.
    pub fn build(root: &Root, snapshot: &Snapshot) -> Self {
        let mut table = Self {
            root: root.clone(),
            routes: Vec::new(),
            index: HashMap::new(),
        };

        for card in &snapshot.cards {
            for control in &card.controls {
                for route in control_routes(root, &card.card, control) {
                    table.insert(route);
                }
            }
        }

        debug!("Built {} routes under {}", table.routes.len(), root);
        table
    }

    fn insert(&mut self, route: Route) {
        if let Some(&existing) = self.index.get(&route.address) {
            warn!(
                "Address {} already routed to {}; ignoring route to {}",
                route.address, self.routes[existing].entry.target, route.entry.target
            );
            return;
        }

        self.index.insert(route.address.clone(), self.routes.len());
        self.routes.push(route);
    }

    /// Exact-match lookup
    pub fn lookup(&self, address: &str) -> Option<&RouteEntry> {
        self.index.get(address).map(|&i| &self.routes[i].entry)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(address)
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Routes in build order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_level(0.86).unwrap(), Level::Percent(86));
        assert_eq!(percent_level(0.86f32 as f64).unwrap(), Level::Percent(86));
        assert_eq!(percent_level(0.005).unwrap(), Level::Percent(1));
        assert_eq!(percent_level(0.0).unwrap(), Level::Percent(0));
        assert_eq!(percent_level(1.0).unwrap(), Level::Percent(100));
    }

    #[test]
    fn test_percent_clamps() {
        assert_eq!(percent_level(1.5).unwrap(), Level::Percent(100));
        assert_eq!(percent_level(-0.2).unwrap(), Level::Percent(0));
        assert!(percent_level(f64::NAN).is_err());
        assert!(percent_level(f64::INFINITY).is_err());
    }

    #[test]
    fn test_decibel_clamps_to_range() {
        let range = ValueRange::new(-60.0, 0.0);
        assert_eq!(decibel_level(-18.0, range).unwrap(), Level::Decibel(-18.0));
        assert_eq!(decibel_level(-90.0, range).unwrap(), Level::Decibel(-60.0));
        assert_eq!(decibel_level(3.0, range).unwrap(), Level::Decibel(0.0));
    }

    #[test]
    fn test_route_count_matches_generation() {
        let root = Root::default();
        let card = CardInfo::new(0, "PCH");
        for channels in 1..=8 {
            for (mute, rec) in [(false, false), (true, false), (false, true), (true, true)] {
                let control = ControlDescriptor::new(0, "Capture")
                    .with_channels(channels)
                    .with_mute(mute)
                    .with_record(rec);
                assert_eq!(
                    control_routes(&root, &card, &control).len(),
                    control_route_count(&control)
                );
            }
        }
    }

    #[test]
    fn test_single_arg_required() {
        assert!(single_arg(&[]).is_err());
        assert!(single_arg(&[Value::Float(0.1), Value::Float(0.2)]).is_err());
        assert!(single_arg(&[Value::Float(0.1)]).is_ok());
    }
}
