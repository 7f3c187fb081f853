//! Suggestion card layout
//!
//! Cards are positioned next to the annotated text, each as close as
//! possible to the vertical offset of its removed-text marker without
//! overlapping its neighbours. Measuring markers and cards is the view
//! layer's job; everything here is a pure function of those measurements.
//!
//! Two modes:
//! - **stack** (nothing selected): cards in desired order, each at
//!   `max(desired, previous bottom + spacing)`, never above 0
//! - **anchored** (one selected): the selected card sits exactly at its
//!   desired offset; cards above are pushed up and cards below pushed down
//!   just enough to clear it

use serde::{Deserialize, Serialize};

/// Card geometry constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap between cards
    pub card_spacing: f64,
    /// Height estimate for an unmeasured card
    pub base_height: f64,
    /// Extra height estimate for an unmeasured selected card
    pub details_height: f64,
    /// Padding added to a measured card height
    pub measured_padding: f64,
    /// Distance a card is raised above its marker
    pub anchor_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_spacing: 12.0,
            base_height: 70.0,
            details_height: 200.0,
            measured_padding: 12.0,
            anchor_offset: 10.0,
        }
    }
}

/// Scroll state of the card container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Top of the container in the same coordinate space as marker tops
    pub container_top: f64,
    /// Current scroll offset of the container
    pub scroll_top: f64,
}

/// One card to place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    /// Preferred top offset
    pub desired_y: f64,
    /// Rendered height, once known
    #[serde(default)]
    pub measured_height: Option<f64>,
}

impl LayoutConfig {
    /// Offset used for card `index` before its marker has been measured
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fallback_y(&self, index: usize) -> f64 {
        index as f64 * (self.base_height + self.card_spacing)
    }

    /// Desired offset of card `index` from its marker's top, if rendered
    #[must_use]
    pub fn desired_y(&self, index: usize, marker_top: Option<f64>, viewport: Viewport) -> f64 {
        match marker_top {
            Some(top) => top - viewport.container_top + viewport.scroll_top - self.anchor_offset,
            None => self.fallback_y(index),
        }
    }

    /// Height used for placement: measured plus padding, else an estimate
    #[must_use]
    pub fn card_height(&self, measured: Option<f64>, selected: bool) -> f64 {
        match measured {
            Some(h) if h > 0.0 => h + self.measured_padding,
            _ if selected => self.base_height + self.details_height,
            _ => self.base_height,
        }
    }

    /// Cards for a list of marker tops (one per suggestion, list order)
    #[must_use]
    pub fn cards_from_markers(
        &self,
        marker_tops: &[Option<f64>],
        measured_heights: &[Option<f64>],
        viewport: Viewport,
    ) -> Vec<CardInput> {
        marker_tops
            .iter()
            .enumerate()
            .map(|(i, top)| CardInput {
                desired_y: self.desired_y(i, *top, viewport),
                measured_height: measured_heights.get(i).copied().flatten(),
            })
            .collect()
    }
}

struct Slot {
    index: usize,
    desired: f64,
    height: f64,
}

/// Top offsets for `cards`, indexed like the input
///
/// A `selected` position outside the list falls back to stack mode.
#[must_use]
pub fn layout_cards(
    cards: &[CardInput],
    selected: Option<usize>,
    config: &LayoutConfig,
) -> Vec<f64> {
    let slots: Vec<Slot> = cards
        .iter()
        .enumerate()
        .map(|(index, card)| Slot {
            index,
            desired: card.desired_y,
            height: config.card_height(card.measured_height, selected == Some(index)),
        })
        .collect();

    let mut positions = vec![0.0; cards.len()];
    match selected.and_then(|s| slots.get(s)) {
        Some(anchor) => place_anchored(&slots, anchor, config, &mut positions),
        None => place_stacked(slots, config, &mut positions),
    }
    positions
}

fn place_stacked(mut slots: Vec<Slot>, config: &LayoutConfig, positions: &mut [f64]) {
    slots.sort_by(|a, b| a.desired.total_cmp(&b.desired));
    let mut next_free = 0.0_f64;
    for slot in slots {
        let y = slot.desired.max(next_free);
        positions[slot.index] = y;
        next_free = y + slot.height + config.card_spacing;
    }
}

fn place_anchored(slots: &[Slot], anchor: &Slot, config: &LayoutConfig, positions: &mut [f64]) {
    positions[anchor.index] = anchor.desired;

    let mut above: Vec<&Slot> = slots
        .iter()
        .filter(|s| s.index != anchor.index && s.desired < anchor.desired)
        .collect();
    above.sort_by(|a, b| b.desired.total_cmp(&a.desired));
    let mut ceiling = anchor.desired;
    for slot in above {
        let y = slot.desired.min(ceiling - slot.height - config.card_spacing);
        positions[slot.index] = y;
        ceiling = y;
    }

    let mut below: Vec<&Slot> = slots
        .iter()
        .filter(|s| s.index != anchor.index && s.desired >= anchor.desired)
        .collect();
    below.sort_by(|a, b| a.desired.total_cmp(&b.desired));
    let mut floor = anchor.desired + anchor.height + config.card_spacing;
    for slot in below {
        let y = slot.desired.max(floor);
        positions[slot.index] = y;
        floor = y + slot.height + config.card_spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(desired_y: f64, measured: Option<f64>) -> CardInput {
        CardInput {
            desired_y,
            measured_height: measured,
        }
    }

    #[test]
    fn heights() {
        let cfg = LayoutConfig::default();
        assert!((cfg.card_height(None, false) - 70.0).abs() < f64::EPSILON);
        assert!((cfg.card_height(None, true) - 270.0).abs() < f64::EPSILON);
        assert!((cfg.card_height(Some(50.0), true) - 62.0).abs() < f64::EPSILON);
        assert!((cfg.card_height(Some(0.0), false) - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn desired_offsets() {
        let cfg = LayoutConfig::default();
        let viewport = Viewport {
            container_top: 100.0,
            scroll_top: 40.0,
        };
        assert!((cfg.desired_y(0, Some(300.0), viewport) - 230.0).abs() < f64::EPSILON);
        assert!((cfg.desired_y(2, None, viewport) - 164.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stack_mode_pushes_down() {
        let cfg = LayoutConfig::default();
        let cards = [card(0.0, Some(58.0)), card(10.0, Some(58.0)), card(500.0, None)];
        // heights 70, 70, 70
        assert_eq!(layout_cards(&cards, None, &cfg), vec![0.0, 82.0, 500.0]);
    }

    #[test]
    fn stack_mode_orders_by_desired_not_list() {
        let cfg = LayoutConfig::default();
        let cards = [card(100.0, None), card(95.0, None)];
        assert_eq!(layout_cards(&cards, None, &cfg), vec![177.0, 95.0]);
    }

    #[test]
    fn stack_mode_never_goes_negative() {
        let cfg = LayoutConfig::default();
        assert_eq!(layout_cards(&[card(-30.0, None)], None, &cfg), vec![0.0]);
    }

    #[test]
    fn anchored_mode_pins_selected() {
        let cfg = LayoutConfig::default();
        let cards = [
            card(100.0, Some(58.0)),
            card(120.0, Some(58.0)),
            card(130.0, Some(58.0)),
        ];
        let positions = layout_cards(&cards, Some(1), &cfg);
        assert_eq!(positions, vec![120.0 - 70.0 - 12.0, 120.0, 120.0 + 70.0 + 12.0]);
    }

    #[test]
    fn anchored_mode_keeps_clear_cards_in_place() {
        let cfg = LayoutConfig::default();
        let cards = [card(0.0, Some(58.0)), card(400.0, Some(58.0)), card(900.0, Some(58.0))];
        assert_eq!(layout_cards(&cards, Some(1), &cfg), vec![0.0, 400.0, 900.0]);
    }

    #[test]
    fn anchored_mode_uses_detail_estimate_for_unmeasured_selection() {
        let cfg = LayoutConfig::default();
        let cards = [card(0.0, None), card(10.0, None)];
        assert_eq!(layout_cards(&cards, Some(0), &cfg), vec![0.0, 282.0]);
    }

    #[test]
    fn out_of_range_selection_stacks() {
        let cfg = LayoutConfig::default();
        let cards = [card(0.0, None), card(0.0, None)];
        assert_eq!(
            layout_cards(&cards, Some(5), &cfg),
            layout_cards(&cards, None, &cfg)
        );
    }

    #[test]
    fn cards_from_markers_fills_fallbacks() {
        let cfg = LayoutConfig::default();
        let cards = cfg.cards_from_markers(&[Some(50.0), None], &[Some(40.0)], Viewport::default());
        assert_eq!(cards, vec![card(40.0, Some(40.0)), card(82.0, None)]);
    }

    #[test]
    fn empty_layout() {
        assert!(layout_cards(&[], Some(0), &LayoutConfig::default()).is_empty());
    }
}
