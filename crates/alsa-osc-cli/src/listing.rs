//! Human-readable route announcement

use alsa_osc_core::{ChannelSelector, RouteOp, RouteTable, Snapshot, Units};
use colored::Colorize;
use std::fmt::Write;

/// Describe every card and control in enumeration order, with the routes
/// `table` actually serves for it
pub fn render(table: &RouteTable, snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for card in &snapshot.cards {
        let _ = writeln!(
            out,
            "{} {} (card {}, {})",
            "Audio interface:".green().bold(),
            card.card.name,
            card.card.index,
            card.card.long_name
        );

        if card.controls.is_empty() {
            let _ = writeln!(out, "\tNo controls found...");
            let _ = writeln!(out);
            continue;
        }

        for control in &card.controls {
            let _ = writeln!(out, "\t'{}' control", control.name.cyan());

            let target = control.target();
            let mut served = 0;

            for route in table.iter().filter(|r| r.entry.target == target) {
                served += 1;
                match &route.entry.op {
                    RouteOp::SetVolume {
                        channel: ChannelSelector::All,
                        units,
                        ..
                    } => {
                        let (label, range) = match units {
                            Units::Percent => ("Volume control route:", control.range),
                            Units::Decibel => ("Volume control in dB route:", control.db_range),
                        };
                        let _ = writeln!(out, "\t\t{} {}", label, route.address);
                        let _ = writeln!(out, "\t\t\tMin value: {}", range.min);
                        let _ = writeln!(out, "\t\t\tMax value: {}", range.max);
                    }
                    RouteOp::SetVolume {
                        channel: ChannelSelector::Channel(n),
                        ..
                    } => {
                        let _ = writeln!(out, "\t\t\tChannel {} control: {}", n, route.address);
                    }
                    RouteOp::SetMute => {
                        let _ = writeln!(out, "\t\tMute control route: {}", route.address);
                        let _ = writeln!(out, "\t\t\t1 to mute, 0 to unmute");
                    }
                    RouteOp::SetRecord => {
                        let _ = writeln!(out, "\t\tRec control route: {}", route.address);
                        let _ = writeln!(out, "\t\t\t1 to record arm, 0 to unset");
                    }
                }
            }

            if served == 0 {
                let _ = writeln!(
                    out,
                    "\t\t{}",
                    "Not served: its addresses belong to an earlier card".yellow()
                );
            }
        }
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsa_osc_core::{CardInfo, CardSnapshot, ControlDescriptor, Root};
    use alsa_osc_test_utils::{fixture_snapshot, usb_codec_card};

    #[test]
    fn test_listing_mentions_every_route() {
        let snapshot = fixture_snapshot();
        let table = RouteTable::build(&Root::default(), &snapshot);
        let text = render(&table, &snapshot);

        for route in table.iter() {
            assert!(text.contains(&route.address), "missing {}", route.address);
        }
    }

    #[test]
    fn test_listing_reports_empty_card_and_ranges() {
        let snapshot = fixture_snapshot();
        let text = render(&RouteTable::build(&Root::default(), &snapshot), &snapshot);

        assert!(text.contains("No controls found..."));
        assert!(text.contains("Min value: -60"));
        assert!(text.contains("Max value: 100"));
        assert!(text.contains("1 to mute, 0 to unmute"));
        assert!(text.contains("1 to record arm, 0 to unset"));
    }

    #[test]
    fn test_listing_matches_served_routes_for_duplicate_card_names() {
        let twin = CardSnapshot::new(
            CardInfo::new(2, "USB Audio CODEC"),
            vec![ControlDescriptor::new(2, "PCM")
                .with_channels(2)
                .with_mute(true)],
        );
        let snapshot = Snapshot::new(vec![usb_codec_card(), twin]);
        let table = RouteTable::build(&Root::default(), &snapshot);
        let text = render(&table, &snapshot);

        let mute = "/alsa/interface/USB Audio CODEC/PCM/mute";
        assert_eq!(text.matches(mute).count(), 1);
        assert!(text.contains("Not served"));
    }
}
