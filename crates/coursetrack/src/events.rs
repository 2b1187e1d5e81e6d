//! Event registration table.
//!
//! Each `(element role, trigger)` pair maps to one plain function taking the
//! page and the event payload and returning the updates to apply. A pair is
//! only registered when the page layout has the element.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::format::Emphasis;
use crate::nav::{self, CarouselMetrics, KeyPress};
use crate::page::{Page, PageLayout};
use crate::storage::KeyValueStore;
use crate::ui::{Prompt, Role, UiUpdate};

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Mouse click.
    Click,
    /// Text typed into an input.
    Input,
    /// Selection moved inside an input.
    Select,
    /// Input value committed, e.g. a file chosen.
    Change,
    /// Element scrolled.
    Scroll,
    /// Window resized.
    Resize,
    /// Key pressed.
    KeyDown,
}

/// Data carried by an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Nothing beyond the event itself.
    None,
    /// The section the event happened in.
    Section(String),
    /// New full text of a note input.
    Note {
        /// Section id.
        section: String,
        /// Full text.
        text: String,
    },
    /// New selection of a note input.
    Selection {
        /// Section id.
        section: String,
        /// Selected char range.
        range: Range<usize>,
    },
    /// Contents of a chosen file; `None` when the picker was dismissed.
    File(Option<String>),
    /// Geometry of the carousel after it moved.
    Carousel(CarouselMetrics),
    /// Index of a clicked carousel item.
    NavItem(usize),
    /// Target of a page-navigation trigger.
    Link(String),
    /// A key press.
    Key(KeyPress),
    /// A click, telling whether it landed inside the FAB menu.
    DocumentClick {
        /// Click target lies inside the menu.
        inside_menu: bool,
    },
}

/// A registered event handler.
pub type Handler<S> = fn(&mut Page<S>, &Payload, &mut dyn Prompt) -> Vec<UiUpdate>;

/// Map from `(role, trigger)` to handler.
#[derive(Debug)]
pub struct HandlerTable<S> {
    handlers: HashMap<(Role, Trigger), Handler<S>>,
}

impl<S: KeyValueStore> HandlerTable<S> {
    /// Register the handlers of every element present in `layout`.
    #[must_use]
    pub fn for_layout(layout: &PageLayout) -> Self {
        let entries: [(Role, Trigger, Handler<S>); 17] = [
            (Role::CompleteButton, Trigger::Click, on_complete),
            (Role::UnmarkButton, Trigger::Click, on_unmark),
            (Role::NotesInput, Trigger::Input, on_note_input),
            (Role::NotesInput, Trigger::Select, on_note_select),
            (Role::BoldButton, Trigger::Click, on_bold),
            (Role::ItalicButton, Trigger::Click, on_italic),
            (Role::ClearButton, Trigger::Click, on_clear),
            (Role::ExportButton, Trigger::Click, on_export),
            (Role::ImportDataButton, Trigger::Click, on_import_button),
            (Role::ImportInput, Trigger::Change, on_import_file),
            (Role::LeftScroll, Trigger::Click, on_scroll_left),
            (Role::RightScroll, Trigger::Click, on_scroll_right),
            (Role::NavCarousel, Trigger::Scroll, on_carousel_moved),
            (Role::NavLink, Trigger::Click, on_nav_link),
            (Role::MainFab, Trigger::Click, on_fab),
            (Role::Document, Trigger::KeyDown, on_key_down),
            (Role::Document, Trigger::Click, on_document_click),
        ];

        let mut handlers = HashMap::new();
        for (role, trigger, handler) in entries {
            if layout.has(role) {
                handlers.insert((role, trigger), handler);
            }
        }
        if layout.carousel {
            handlers.insert((Role::Window, Trigger::Resize), on_carousel_moved as Handler<S>);
        }
        if layout.left_nav {
            handlers.insert((Role::LeftNav, Trigger::Click), on_page_link as Handler<S>);
        }
        if layout.right_nav {
            handlers.insert((Role::RightNav, Trigger::Click), on_page_link as Handler<S>);
        }

        trace!("Registered {} event handlers", handlers.len());
        Self { handlers }
    }

    /// Handler for `(role, trigger)`, if registered.
    #[must_use]
    pub fn get(&self, role: Role, trigger: Trigger) -> Option<Handler<S>> {
        self.handlers.get(&(role, trigger)).copied()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn section_of(payload: &Payload) -> Option<&str> {
    match payload {
        Payload::Section(id)
        | Payload::Note { section: id, .. }
        | Payload::Selection { section: id, .. } => Some(id),
        _ => None,
    }
}

fn on_complete<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    section_of(payload).map_or_else(Vec::new, |id| page.manager.mark_complete(id))
}

fn on_unmark<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    section_of(payload).map_or_else(Vec::new, |id| page.manager.unmark(id))
}

fn on_note_input<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match payload {
        Payload::Note { section, text } => page.manager.edit_note(section, text),
        _ => Vec::new(),
    }
}

fn on_note_select<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match payload {
        Payload::Selection { section, range } => page.manager.select(section, range.clone()),
        _ => Vec::new(),
    }
}

fn on_bold<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    section_of(payload).map_or_else(Vec::new, |id| page.manager.apply_format(id, Emphasis::Bold))
}

fn on_italic<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    section_of(payload).map_or_else(Vec::new, |id| {
        page.manager.apply_format(id, Emphasis::Italic)
    })
}

fn on_clear<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    prompt: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    section_of(payload).map_or_else(Vec::new, |id| page.manager.clear_note(id, prompt))
}

fn on_export<S: KeyValueStore>(
    page: &mut Page<S>,
    _: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    page.manager.export_download()
}

fn on_import_button<S: KeyValueStore>(
    _: &mut Page<S>,
    _: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    vec![UiUpdate::Click {
        role: Role::ImportInput,
    }]
}

fn on_import_file<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match payload {
        Payload::File(Some(contents)) => page.manager.import_file(contents),
        _ => Vec::new(),
    }
}

fn on_scroll_left<S: KeyValueStore>(
    page: &mut Page<S>,
    _: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    page.carousel
        .as_ref()
        .map_or_else(Vec::new, nav::Carousel::scroll_left)
}

fn on_scroll_right<S: KeyValueStore>(
    page: &mut Page<S>,
    _: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    page.carousel
        .as_ref()
        .map_or_else(Vec::new, nav::Carousel::scroll_right)
}

fn on_carousel_moved<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match (page.carousel.as_mut(), payload) {
        (Some(carousel), Payload::Carousel(metrics)) => carousel.update(*metrics),
        (Some(carousel), _) => vec![carousel.buttons()],
        (None, _) => Vec::new(),
    }
}

fn on_nav_link<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match (page.carousel.as_mut(), payload) {
        (Some(carousel), Payload::NavItem(index)) => carousel.activate(*index),
        _ => Vec::new(),
    }
}

fn on_fab<S: KeyValueStore>(
    page: &mut Page<S>,
    _: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    vec![page.fab.toggle()]
}

fn on_document_click<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    if !page.layout.fab {
        return Vec::new();
    }
    match payload {
        Payload::DocumentClick { inside_menu: false } => page.fab.close().into_iter().collect(),
        _ => Vec::new(),
    }
}

fn on_key_down<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    let Payload::Key(press) = payload else {
        return Vec::new();
    };
    match nav::shortcut(press) {
        Some(shortcut) if page.layout.has(shortcut.target()) => vec![UiUpdate::Click {
            role: shortcut.target(),
        }],
        _ => Vec::new(),
    }
}

fn on_page_link<S: KeyValueStore>(
    page: &mut Page<S>,
    payload: &Payload,
    _: &mut dyn Prompt,
) -> Vec<UiUpdate> {
    match payload {
        Payload::Link(target) => {
            nav::navigate(target.as_str(), page.navigate_delay, page.layout.loading_overlay)
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PageContext;
    use crate::manager::SectionStateManager;
    use crate::nav::Carousel;
    use crate::section::{Section, SectionStatus};
    use crate::storage::MemoryStore;
    use crate::ui::FixedAnswer;

    fn page(layout: PageLayout) -> Page<MemoryStore> {
        let manager = SectionStateManager::new(
            MemoryStore::new(),
            PageContext::new("/week-1", "Week 1"),
            vec![Section::new("intro")],
        );
        Page::new(manager, layout)
    }

    fn click(page: &mut Page<MemoryStore>, role: Role, payload: &Payload) -> Vec<UiUpdate> {
        page.dispatch(role, Trigger::Click, payload, &mut FixedAnswer(true))
    }

    fn section() -> Payload {
        Payload::Section("intro".to_string())
    }

    #[test]
    fn test_full_layout_registers_everything() {
        let table: HandlerTable<MemoryStore> = HandlerTable::for_layout(&PageLayout::default());
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_bare_layout_keeps_document_handlers_only() {
        let layout = PageLayout {
            complete_buttons: false,
            unmark_buttons: false,
            note_inputs: false,
            format_buttons: false,
            clear_buttons: false,
            export_button: false,
            import_controls: false,
            carousel: false,
            fab: false,
            loading_overlay: false,
            left_nav: false,
            right_nav: false,
        };
        let table: HandlerTable<MemoryStore> = HandlerTable::for_layout(&layout);
        assert_eq!(table.len(), 2);
        assert!(table.get(Role::Document, Trigger::KeyDown).is_some());
        assert!(table.get(Role::CompleteButton, Trigger::Click).is_none());
    }

    #[test]
    fn test_complete_and_unmark_clicks() {
        let mut page = page(PageLayout::default());
        let updates = click(&mut page, Role::CompleteButton, &section());
        assert_eq!(
            updates,
            vec![UiUpdate::SectionStyle {
                section: "intro".to_string(),
                status: SectionStatus::Completed,
            }]
        );

        click(&mut page, Role::UnmarkButton, &section());
        assert!(page.manager.store().is_empty().unwrap());
    }

    #[test]
    fn test_select_then_bold() {
        let mut page = page(PageLayout::default());
        let mut prompt = FixedAnswer(true);
        page.dispatch(
            Role::NotesInput,
            Trigger::Input,
            &Payload::Note {
                section: "intro".to_string(),
                text: "say hello now".to_string(),
            },
            &mut prompt,
        );
        page.dispatch(
            Role::NotesInput,
            Trigger::Select,
            &Payload::Selection {
                section: "intro".to_string(),
                range: 4..9,
            },
            &mut prompt,
        );
        click(&mut page, Role::BoldButton, &section());

        assert_eq!(
            page.manager.section("intro").unwrap().note_text(),
            "say **hello** now"
        );
    }

    #[test]
    fn test_clear_uses_prompt() {
        let mut page = page(PageLayout::default());
        page.manager.edit_note("intro", "text");

        let declined = page.dispatch(
            Role::ClearButton,
            Trigger::Click,
            &section(),
            &mut FixedAnswer(false),
        );
        assert!(declined.is_empty());

        click(&mut page, Role::ClearButton, &section());
        assert_eq!(page.manager.section("intro").unwrap().note_text(), "");
    }

    #[test]
    fn test_import_button_opens_file_input() {
        let mut page = page(PageLayout::default());
        assert_eq!(
            click(&mut page, Role::ImportDataButton, &Payload::None),
            vec![UiUpdate::Click {
                role: Role::ImportInput
            }]
        );
    }

    #[test]
    fn test_import_change_without_file_does_nothing() {
        let mut page = page(PageLayout::default());
        let updates = page.dispatch(
            Role::ImportInput,
            Trigger::Change,
            &Payload::File(None),
            &mut FixedAnswer(true),
        );
        assert!(updates.is_empty());
    }

    #[test]
    fn test_import_change_with_file() {
        let mut page = page(PageLayout::default());
        let updates = page.dispatch(
            Role::ImportInput,
            Trigger::Change,
            &Payload::File(Some(r#"{"/week-1-intro": "completed"}"#.to_string())),
            &mut FixedAnswer(true),
        );
        assert!(updates.contains(&UiUpdate::Reload));
        assert!(page.manager.section("intro").unwrap().completed);
    }

    #[test]
    fn test_ctrl_s_clicks_export() {
        let mut page = page(PageLayout::default());
        let updates = page.dispatch(
            Role::Document,
            Trigger::KeyDown,
            &Payload::Key(KeyPress::parse("ctrl+s").unwrap()),
            &mut FixedAnswer(true),
        );
        assert_eq!(
            updates,
            vec![UiUpdate::Click {
                role: Role::ExportButton
            }]
        );
    }

    #[test]
    fn test_shortcut_to_missing_element_is_ignored() {
        let mut page = page(PageLayout::sections_only());
        let updates = page.dispatch(
            Role::Document,
            Trigger::KeyDown,
            &Payload::Key(KeyPress::parse("ctrl+ArrowRight").unwrap()),
            &mut FixedAnswer(true),
        );
        assert!(updates.is_empty());
    }

    #[test]
    fn test_fab_toggle_and_outside_click() {
        let mut page = page(PageLayout::default());
        assert_eq!(
            click(&mut page, Role::MainFab, &Payload::None),
            vec![UiUpdate::FabMenu { open: true }]
        );
        assert!(click(
            &mut page,
            Role::Document,
            &Payload::DocumentClick { inside_menu: true }
        )
        .is_empty());
        assert_eq!(
            click(
                &mut page,
                Role::Document,
                &Payload::DocumentClick { inside_menu: false }
            ),
            vec![UiUpdate::FabMenu { open: false }]
        );
    }

    #[test]
    fn test_carousel_scroll_and_resize() {
        let metrics = CarouselMetrics {
            scroll_left: 0.0,
            scroll_width: 1000.0,
            client_width: 400.0,
        };
        let mut page = page(PageLayout::default()).with_carousel(Carousel::new(metrics, 200));

        assert!(click(&mut page, Role::LeftScroll, &Payload::None).is_empty());
        assert_eq!(
            click(&mut page, Role::RightScroll, &Payload::None),
            vec![UiUpdate::ScrollCarousel { delta: 200 }]
        );

        let moved = CarouselMetrics {
            scroll_left: 200.0,
            ..metrics
        };
        let updates = page.dispatch(
            Role::NavCarousel,
            Trigger::Scroll,
            &Payload::Carousel(moved),
            &mut FixedAnswer(true),
        );
        assert_eq!(
            updates,
            vec![UiUpdate::ScrollButtons {
                left_disabled: false,
                right_disabled: false
            }]
        );

        let resized = page.dispatch(
            Role::Window,
            Trigger::Resize,
            &Payload::None,
            &mut FixedAnswer(true),
        );
        assert_eq!(resized.len(), 1);
    }

    #[test]
    fn test_nav_link_activates_item() {
        let mut page = page(PageLayout::default());
        let updates = click(&mut page, Role::NavLink, &Payload::NavItem(4));
        assert_eq!(updates[0], UiUpdate::ActivateNavItem { index: 4 });
    }

    #[test]
    fn test_page_link_shows_loading_then_navigates() {
        let mut page = page(PageLayout::default());
        let updates = click(
            &mut page,
            Role::RightNav,
            &Payload::Link("/week-2".to_string()),
        );
        assert_eq!(updates[0], UiUpdate::ShowLoading);
        assert!(matches!(updates[1], UiUpdate::Navigate { .. }));
    }
}
