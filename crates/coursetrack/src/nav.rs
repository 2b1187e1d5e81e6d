//! Page navigation helpers.
//!
//! These are direct reactions with no stored state beyond a flag or two:
//! carousel scroll buttons, section-to-section scrolling, the floating
//! action menu and keyboard shortcuts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ui::{Role, UiUpdate};

/// Shown when asking for the section after the last one.
pub const LAST_SECTION_MESSAGE: &str = "You are at the last video!";

/// Shown when asking for the section before the first one.
pub const FIRST_SECTION_MESSAGE: &str = "You are at the first video!";

/// Horizontal scroll geometry of the carousel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselMetrics {
    /// Current horizontal scroll offset.
    pub scroll_left: f64,
    /// Total scrollable width.
    pub scroll_width: f64,
    /// Visible width.
    pub client_width: f64,
}

impl CarouselMetrics {
    /// Whether the carousel sits at its left edge.
    #[must_use]
    pub fn at_start(&self) -> bool {
        self.scroll_left <= 0.0
    }

    /// Whether the carousel sits at its right edge, with 1px of slack.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.scroll_left >= self.scroll_width - self.client_width - 1.0
    }
}

/// The navigation carousel and its two scroll buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    metrics: CarouselMetrics,
    step: i32,
    active: Option<usize>,
}

impl Carousel {
    /// A carousel scrolling `step_px` per click.
    #[must_use]
    pub fn new(metrics: CarouselMetrics, step_px: u32) -> Self {
        Self {
            metrics,
            step: i32::try_from(step_px).unwrap_or(i32::MAX),
            active: None,
        }
    }

    /// Mark an item active at construction.
    #[must_use]
    pub fn with_active(mut self, index: usize) -> Self {
        self.active = Some(index);
        self
    }

    /// Index of the active item.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Current geometry.
    #[must_use]
    pub fn metrics(&self) -> CarouselMetrics {
        self.metrics
    }

    /// Updates shown once the page has loaded.
    #[must_use]
    pub fn start(&self) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        if let Some(index) = self.active {
            updates.push(UiUpdate::RevealNavItem { index });
        }
        updates.push(self.buttons());
        updates
    }

    /// Current state of both scroll buttons.
    #[must_use]
    pub fn buttons(&self) -> UiUpdate {
        UiUpdate::ScrollButtons {
            left_disabled: self.metrics.at_start(),
            right_disabled: self.metrics.at_end(),
        }
    }

    /// Take new geometry after a scroll or resize.
    pub fn update(&mut self, metrics: CarouselMetrics) -> Vec<UiUpdate> {
        self.metrics = metrics;
        vec![self.buttons()]
    }

    /// Click on the left button; nothing while it is disabled.
    #[must_use]
    pub fn scroll_left(&self) -> Vec<UiUpdate> {
        if self.metrics.at_start() {
            return Vec::new();
        }
        vec![UiUpdate::ScrollCarousel { delta: -self.step }]
    }

    /// Click on the right button; nothing while it is disabled.
    #[must_use]
    pub fn scroll_right(&self) -> Vec<UiUpdate> {
        if self.metrics.at_end() {
            return Vec::new();
        }
        vec![UiUpdate::ScrollCarousel { delta: self.step }]
    }

    /// Click on a carousel link.
    pub fn activate(&mut self, index: usize) -> Vec<UiUpdate> {
        self.active = Some(index);
        vec![UiUpdate::ActivateNavItem { index }, self.buttons()]
    }
}

/// Direction of section navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward the next section.
    Next,
    /// Toward the previous section.
    Previous,
}

/// Vertical geometry of one section, relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    /// Top edge relative to the viewport.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

/// Window geometry needed for scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current vertical page offset.
    pub page_y_offset: f64,
    /// Window inner height.
    pub inner_height: f64,
    /// Height of the fixed header, 0 without one.
    pub header_height: f64,
}

/// Scroll to the neighbour of `current` and center it below the header.
///
/// Past the last section the next-page trigger is clicked when it is shown;
/// otherwise the user is told there is nowhere to go.
#[must_use]
pub fn navigate_to_section(
    direction: Direction,
    current: usize,
    sections: &[SectionBox],
    viewport: Viewport,
    next_page_visible: bool,
) -> UiUpdate {
    let target = match direction {
        Direction::Next => current.checked_add(1),
        Direction::Previous => current.checked_sub(1),
    };

    match target {
        Some(index) if index < sections.len() => {
            let section = sections[index];
            let center_offset = (viewport.inner_height - section.height) / 2.0;
            UiUpdate::ScrollWindow {
                top: section.top + viewport.page_y_offset - viewport.header_height - center_offset,
            }
        }
        _ if direction == Direction::Next => {
            if next_page_visible {
                UiUpdate::Click {
                    role: Role::RightNav,
                }
            } else {
                UiUpdate::alert(LAST_SECTION_MESSAGE)
            }
        }
        _ => UiUpdate::alert(FIRST_SECTION_MESSAGE),
    }
}

/// Scroll target for an in-page anchor, keeping `gap_px` below the header.
#[must_use]
pub fn anchor_scroll(element_top: f64, viewport: Viewport, gap_px: u32) -> UiUpdate {
    UiUpdate::ScrollWindow {
        top: element_top + viewport.page_y_offset - viewport.header_height - f64::from(gap_px),
    }
}

/// Leave for another page, showing the loading overlay first if there is one.
#[must_use]
pub fn navigate(target: impl Into<String>, delay: Duration, loading_overlay: bool) -> Vec<UiUpdate> {
    let mut updates = Vec::with_capacity(2);
    if loading_overlay {
        updates.push(UiUpdate::ShowLoading);
    }
    updates.push(UiUpdate::Navigate {
        target: target.into(),
        delay,
    });
    updates
}

/// Open/closed state of the floating action menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FabMenu {
    open: bool,
}

impl FabMenu {
    /// Whether the menu is shown.
    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }

    /// Click on the action button.
    pub fn toggle(&mut self) -> UiUpdate {
        self.open = !self.open;
        UiUpdate::FabMenu { open: self.open }
    }

    /// Click anywhere outside the menu.
    pub fn close(&mut self) -> Option<UiUpdate> {
        if self.open {
            self.open = false;
            Some(UiUpdate::FabMenu { open: false })
        } else {
            None
        }
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key value, e.g. `s` or `ArrowLeft`.
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Meta (Command) held.
    pub meta: bool,
}

impl KeyPress {
    /// A key press without modifiers.
    #[must_use]
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    /// Parse a combo such as `ctrl+s` or `meta+ArrowRight`.
    ///
    /// Modifier names are case-insensitive; the key itself is kept as
    /// written. Returns `None` for an unknown modifier or a missing key.
    #[must_use]
    pub fn parse(combo: &str) -> Option<Self> {
        let mut parts: Vec<&str> = combo.split('+').collect();
        let key = parts.pop().filter(|k| !k.is_empty())?;

        let mut press = Self::plain(key);
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "meta" | "cmd" | "command" => press.meta = true,
                _ => return None,
            }
        }
        Some(press)
    }
}

/// What a keyboard shortcut asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Go to the previous page.
    PreviousPage,
    /// Go to the next page.
    NextPage,
    /// Export the page's saved state.
    Export,
}

impl Shortcut {
    /// Element the shortcut clicks.
    #[must_use]
    pub fn target(self) -> Role {
        match self {
            Self::PreviousPage => Role::LeftNav,
            Self::NextPage => Role::RightNav,
            Self::Export => Role::ExportButton,
        }
    }
}

/// Map a key press to a shortcut; Ctrl or Meta must be held.
#[must_use]
pub fn shortcut(press: &KeyPress) -> Option<Shortcut> {
    if !(press.ctrl || press.meta) {
        return None;
    }
    match press.key.as_str() {
        "ArrowLeft" => Some(Shortcut::PreviousPage),
        "ArrowRight" => Some(Shortcut::NextPage),
        "s" => Some(Shortcut::Export),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_left: f64) -> CarouselMetrics {
        CarouselMetrics {
            scroll_left,
            scroll_width: 1000.0,
            client_width: 400.0,
        }
    }

    #[test]
    fn test_buttons_at_start() {
        let carousel = Carousel::new(metrics(0.0), 200);
        assert_eq!(
            carousel.buttons(),
            UiUpdate::ScrollButtons {
                left_disabled: true,
                right_disabled: false
            }
        );
    }

    #[test]
    fn test_buttons_at_end_with_slack() {
        let carousel = Carousel::new(metrics(599.0), 200);
        assert_eq!(
            carousel.buttons(),
            UiUpdate::ScrollButtons {
                left_disabled: false,
                right_disabled: true
            }
        );
    }

    #[test]
    fn test_scroll_clicks() {
        let carousel = Carousel::new(metrics(100.0), 200);
        assert_eq!(
            carousel.scroll_left(),
            vec![UiUpdate::ScrollCarousel { delta: -200 }]
        );
        assert_eq!(
            carousel.scroll_right(),
            vec![UiUpdate::ScrollCarousel { delta: 200 }]
        );
    }

    #[test]
    fn test_disabled_buttons_do_nothing() {
        assert!(Carousel::new(metrics(0.0), 200).scroll_left().is_empty());
        assert!(Carousel::new(metrics(600.0), 200).scroll_right().is_empty());
    }

    #[test]
    fn test_update_recomputes_buttons() {
        let mut carousel = Carousel::new(metrics(0.0), 200);
        let updates = carousel.update(metrics(300.0));
        assert_eq!(
            updates,
            vec![UiUpdate::ScrollButtons {
                left_disabled: false,
                right_disabled: false
            }]
        );
    }

    #[test]
    fn test_start_reveals_active_item() {
        let carousel = Carousel::new(metrics(0.0), 200).with_active(3);
        let updates = carousel.start();
        assert_eq!(updates[0], UiUpdate::RevealNavItem { index: 3 });
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn test_activate_link() {
        let mut carousel = Carousel::new(metrics(0.0), 200);
        let updates = carousel.activate(2);
        assert_eq!(carousel.active(), Some(2));
        assert_eq!(updates[0], UiUpdate::ActivateNavItem { index: 2 });
    }

    fn boxes() -> Vec<SectionBox> {
        vec![
            SectionBox {
                top: 100.0,
                height: 300.0,
            },
            SectionBox {
                top: 500.0,
                height: 200.0,
            },
        ]
    }

    fn viewport() -> Viewport {
        Viewport {
            page_y_offset: 50.0,
            inner_height: 800.0,
            header_height: 60.0,
        }
    }

    #[test]
    fn test_navigate_to_next_section_centers_it() {
        let update = navigate_to_section(Direction::Next, 0, &boxes(), viewport(), false);
        // 500 + 50 - 60 - (800 - 200) / 2
        assert_eq!(update, UiUpdate::ScrollWindow { top: 190.0 });
    }

    #[test]
    fn test_navigate_to_previous_section() {
        let update = navigate_to_section(Direction::Previous, 1, &boxes(), viewport(), false);
        // 100 + 50 - 60 - (800 - 300) / 2
        assert_eq!(update, UiUpdate::ScrollWindow { top: -160.0 });
    }

    #[test]
    fn test_navigate_past_last_section() {
        assert_eq!(
            navigate_to_section(Direction::Next, 1, &boxes(), viewport(), true),
            UiUpdate::Click {
                role: Role::RightNav
            }
        );
        assert_eq!(
            navigate_to_section(Direction::Next, 1, &boxes(), viewport(), false),
            UiUpdate::alert(LAST_SECTION_MESSAGE)
        );
    }

    #[test]
    fn test_navigate_before_first_section() {
        assert_eq!(
            navigate_to_section(Direction::Previous, 0, &boxes(), viewport(), true),
            UiUpdate::alert(FIRST_SECTION_MESSAGE)
        );
    }

    #[test]
    fn test_anchor_scroll() {
        assert_eq!(
            anchor_scroll(400.0, viewport(), 20),
            UiUpdate::ScrollWindow { top: 370.0 }
        );
    }

    #[test]
    fn test_navigate_with_and_without_overlay() {
        let delay = Duration::from_millis(300);
        let updates = navigate("/week-2.html", delay, true);
        assert_eq!(updates[0], UiUpdate::ShowLoading);
        assert_eq!(
            updates[1],
            UiUpdate::Navigate {
                target: "/week-2.html".to_string(),
                delay
            }
        );
        assert_eq!(navigate("/week-2.html", delay, false).len(), 1);
    }

    #[test]
    fn test_fab_toggle_and_close() {
        let mut fab = FabMenu::default();
        assert_eq!(fab.toggle(), UiUpdate::FabMenu { open: true });
        assert!(fab.is_open());
        assert_eq!(fab.close(), Some(UiUpdate::FabMenu { open: false }));
        assert_eq!(fab.close(), None);
    }

    #[test]
    fn test_shortcuts_need_modifier() {
        assert_eq!(shortcut(&KeyPress::plain("s")), None);
        assert_eq!(
            shortcut(&KeyPress::parse("ctrl+s").unwrap()),
            Some(Shortcut::Export)
        );
        assert_eq!(
            shortcut(&KeyPress::parse("meta+ArrowLeft").unwrap()),
            Some(Shortcut::PreviousPage)
        );
        assert_eq!(
            shortcut(&KeyPress::parse("Ctrl+ArrowRight").unwrap()),
            Some(Shortcut::NextPage)
        );
        assert_eq!(shortcut(&KeyPress::parse("ctrl+S").unwrap()), None);
    }

    #[test]
    fn test_key_press_parse_errors() {
        assert_eq!(KeyPress::parse("shift+s"), None);
        assert_eq!(KeyPress::parse("ctrl+"), None);
        assert_eq!(KeyPress::parse("s"), Some(KeyPress::plain("s")));
    }

    #[test]
    fn test_shortcut_targets() {
        assert_eq!(Shortcut::Export.target(), Role::ExportButton);
        assert_eq!(Shortcut::PreviousPage.target(), Role::LeftNav);
        assert_eq!(Shortcut::NextPage.target(), Role::RightNav);
    }
}
