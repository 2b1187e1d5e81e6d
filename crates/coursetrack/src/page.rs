//! A page and the optional elements it renders.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::events::{HandlerTable, Payload, Trigger};
use crate::manager::SectionStateManager;
use crate::nav::{self, Carousel, CarouselMetrics, Direction, FabMenu, SectionBox, Viewport};
use crate::storage::KeyValueStore;
use crate::ui::{Prompt, Role, UiUpdate};

/// Which optional elements the host page renders.
///
/// A missing element switches its feature off; nothing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PageLayout {
    /// Per-section complete buttons.
    pub complete_buttons: bool,
    /// Per-section unmark buttons.
    pub unmark_buttons: bool,
    /// Per-section note inputs.
    pub note_inputs: bool,
    /// Bold and italic buttons in notes containers.
    pub format_buttons: bool,
    /// Clear buttons in notes containers.
    pub clear_buttons: bool,
    /// The export button.
    pub export_button: bool,
    /// The import button and its file input.
    pub import_controls: bool,
    /// The carousel with both scroll buttons.
    pub carousel: bool,
    /// The floating action button and its menu.
    pub fab: bool,
    /// The loading overlay.
    pub loading_overlay: bool,
    /// The previous-page trigger.
    pub left_nav: bool,
    /// The next-page trigger.
    pub right_nav: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            complete_buttons: true,
            unmark_buttons: true,
            note_inputs: true,
            format_buttons: true,
            clear_buttons: true,
            export_button: true,
            import_controls: true,
            carousel: true,
            fab: true,
            loading_overlay: true,
            left_nav: true,
            right_nav: true,
        }
    }
}

impl PageLayout {
    /// A page with only the per-section controls and import/export.
    #[must_use]
    pub fn sections_only() -> Self {
        Self {
            carousel: false,
            fab: false,
            loading_overlay: false,
            left_nav: false,
            right_nav: false,
            ..Self::default()
        }
    }

    /// Whether the element playing `role` is on the page.
    #[must_use]
    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::CompleteButton => self.complete_buttons,
            Role::UnmarkButton => self.unmark_buttons,
            Role::NotesInput => self.note_inputs,
            Role::BoldButton | Role::ItalicButton => self.note_inputs && self.format_buttons,
            Role::ClearButton => self.note_inputs && self.clear_buttons,
            Role::ExportButton => self.export_button,
            Role::ImportDataButton | Role::ImportInput => self.import_controls,
            Role::LeftScroll | Role::RightScroll | Role::NavCarousel | Role::NavLink => {
                self.carousel
            }
            Role::MainFab => self.fab,
            Role::LeftNav => self.left_nav,
            Role::RightNav => self.right_nav,
            Role::Document | Role::Window => true,
        }
    }
}

/// Everything a page shows, wired to its handlers.
#[derive(Debug)]
pub struct Page<S> {
    /// Section state.
    pub manager: SectionStateManager<S>,
    /// Elements present.
    pub layout: PageLayout,
    /// The carousel, when the layout has one.
    pub carousel: Option<Carousel>,
    /// Floating action menu state.
    pub fab: FabMenu,
    /// Delay before leaving for another page.
    pub navigate_delay: Duration,
    /// Gap kept between the header and an anchor target.
    pub anchor_gap_px: u32,
    handlers: HandlerTable<S>,
}

impl<S: KeyValueStore> Page<S> {
    /// Build a page with default navigation settings.
    #[must_use]
    pub fn new(manager: SectionStateManager<S>, layout: PageLayout) -> Self {
        Self::with_config(manager, layout, &Config::default())
    }

    /// Build a page using the navigation settings of `config`.
    #[must_use]
    pub fn with_config(manager: SectionStateManager<S>, layout: PageLayout, config: &Config) -> Self {
        let carousel = layout.carousel.then(|| {
            Carousel::new(CarouselMetrics::default(), config.navigation.scroll_step_px)
        });
        Self {
            manager,
            layout,
            carousel,
            fab: FabMenu::default(),
            navigate_delay: config.navigate_delay(),
            anchor_gap_px: config.navigation.anchor_offset_px,
            handlers: HandlerTable::for_layout(&layout),
        }
    }

    /// Replace the carousel, e.g. with real geometry from the host.
    #[must_use]
    pub fn with_carousel(mut self, carousel: Carousel) -> Self {
        if self.layout.carousel {
            self.carousel = Some(carousel);
        }
        self
    }

    /// Run page start: load stored state and settle the carousel.
    pub fn start(&mut self) -> Vec<UiUpdate> {
        let mut updates = self.manager.load();
        if let Some(carousel) = &self.carousel {
            updates.extend(carousel.start());
        }
        updates
    }

    /// Scroll from section `current` to its neighbour.
    ///
    /// The next-page trigger is only used when the layout has one.
    #[must_use]
    pub fn navigate_to_section(
        &self,
        direction: Direction,
        current: usize,
        sections: &[SectionBox],
        viewport: Viewport,
    ) -> UiUpdate {
        nav::navigate_to_section(direction, current, sections, viewport, self.layout.right_nav)
    }

    /// Scroll an in-page anchor target into view below the header.
    #[must_use]
    pub fn scroll_to_anchor(&self, element_top: f64, viewport: Viewport) -> UiUpdate {
        nav::anchor_scroll(element_top, viewport, self.anchor_gap_px)
    }

    /// Deliver one event.
    ///
    /// Events for elements the page does not have produce no updates.
    pub fn dispatch(
        &mut self,
        role: Role,
        trigger: Trigger,
        payload: &Payload,
        prompt: &mut dyn Prompt,
    ) -> Vec<UiUpdate> {
        match self.handlers.get(role, trigger) {
            Some(handler) => handler(self, payload, prompt),
            None => Vec::new(),
        }
    }
}
