use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bevy::math::Vec2;

use super::*;
use crate::host::{HostCommand, HostCommands};
use crate::menu::MenuSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hook {
    Show(&'static str),
    Hide(&'static str),
    Prepare(&'static str),
}

/// Hook calls of every recorder built from the same journal, in call order.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<Hook>>>);

impl Journal {
    fn record(&self, hook: Hook) {
        self.0.lock().unwrap().push(hook);
    }

    fn take(&self) -> Vec<Hook> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    fn count(&self, hook: Hook) -> usize {
        self.0.lock().unwrap().iter().filter(|h| **h == hook).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Greeting(&'static str);

struct Recorder {
    name: &'static str,
    journal: Journal,
    deferred: bool,
    strict: bool,
    closes_on_outside: bool,
    greeting: Option<Greeting>,
}

impl Recorder {
    fn new(name: &'static str, journal: Journal) -> Self {
        Self {
            name,
            journal,
            deferred: false,
            strict: false,
            closes_on_outside: false,
            greeting: None,
        }
    }

    fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn closes_on_outside(mut self) -> Self {
        self.closes_on_outside = true;
        self
    }
}

impl MenuBehaviour for Recorder {
    fn show(&mut self, payload: &MenuPayload) -> Result<(), MenuError> {
        if self.strict || !payload.is_none() {
            self.greeting = Some(payload.get::<Greeting>()?.clone());
        }
        self.journal.record(Hook::Show(self.name));
        Ok(())
    }

    fn on_hide(&mut self) -> HideTransition {
        self.journal.record(Hook::Hide(self.name));
        if self.deferred {
            HideTransition::Deferred
        } else {
            HideTransition::Immediate
        }
    }

    fn prepare_for_pool(&mut self) {
        self.greeting = None;
        self.journal.record(Hook::Prepare(self.name));
    }

    fn on_click_outside(&mut self) -> MenuResponse {
        if self.closes_on_outside {
            MenuResponse::Hide
        } else {
            MenuResponse::Ignore
        }
    }
}

fn recorder(id: &'static str, settings: MenuSettings, journal: &Journal) -> MenuTemplate {
    recorder_with(id, settings, journal, |recorder| recorder)
}

fn recorder_with(
    id: &'static str,
    settings: MenuSettings,
    journal: &Journal,
    configure: fn(Recorder) -> Recorder,
) -> MenuTemplate {
    let journal = journal.clone();
    MenuTemplate::new(id, settings, move || configure(Recorder::new(id, journal.clone())))
}

fn controller(templates: impl IntoIterator<Item = MenuTemplate>) -> MenuController<HostCommands> {
    MenuController::new(
        MenuRegistry::from_templates(templates).unwrap(),
        HostCommands::default(),
    )
}

fn none() -> MenuPayload {
    MenuPayload::none()
}

const BLOCKING: MenuSettings = MenuSettings::new().fullscreen().not_closable();

#[test]
fn hidden_menus_come_back_from_the_pool_reset() {
    let journal = Journal::default();
    let mut menus = controller([recorder("window", MenuSettings::new(), &journal)]);

    let first = menus
        .show_menu("window", MenuPayload::new(Greeting("hello")))
        .unwrap();
    assert!(first.is_shown());
    assert!(menus.hide_menu(first.menu).unwrap());
    assert_eq!(menus.state(first.menu), Some(MenuState::Pooled));
    assert_eq!(menus.pool().len(&MenuId::new("window")), 1);
    assert!(!menus.any_menu_active());

    let _ = menus.host_mut().drain().count();
    let second = menus.show_menu("window", none()).unwrap();

    assert_eq!(second.menu, first.menu);
    assert_eq!(menus.behaviour::<Recorder>(second.menu).unwrap().greeting, None);
    assert!(
        !menus
            .host()
            .iter()
            .any(|command| matches!(command, HostCommand::Spawn(_)))
    );
    assert_eq!(
        journal.take(),
        vec![
            Hook::Show("window"),
            Hook::Hide("window"),
            Hook::Prepare("window"),
            Hook::Show("window"),
        ]
    );
}

#[test]
fn unpooled_menus_are_destroyed_after_hiding() {
    let journal = Journal::default();
    let mut menus = controller([recorder("toast", MenuSettings::new().not_pooled(), &journal)]);

    let shown = menus.show_menu("toast", none()).unwrap();
    menus.hide_menu(shown.menu).unwrap();

    assert!(menus.menu(shown.menu).is_none());
    assert!(
        menus
            .host()
            .iter()
            .any(|command| *command == HostCommand::Despawn(shown.menu))
    );
    assert_eq!(menus.hide_menu(shown.menu), Ok(false));
}

#[test]
fn instances_beyond_pool_capacity_are_destroyed() {
    let journal = Journal::default();
    let mut menus = controller([recorder("toast", MenuSettings::new().pool_capacity(1), &journal)]);

    let a = menus.show_menu("toast", none()).unwrap().menu;
    let b = menus.show_menu("toast", none()).unwrap().menu;
    assert_ne!(a, b);
    menus.hide_menu(a).unwrap();
    menus.hide_menu(b).unwrap();

    assert_eq!(menus.state(a), Some(MenuState::Pooled));
    assert!(menus.menu(b).is_none());
    assert_eq!(menus.pool().total(), 1);
}

#[test]
fn queued_menus_show_in_request_order() {
    let journal = Journal::default();
    let queued = MenuSettings::new().fullscreen().queued();
    let mut menus = controller([
        recorder("intro", BLOCKING, &journal),
        recorder("first", queued, &journal),
        recorder("second", queued, &journal),
    ]);

    let intro = menus.show_menu("intro", none()).unwrap().menu;
    let first = menus.show_menu("first", none()).unwrap();
    let second = menus.show_menu("second", none()).unwrap();
    assert_eq!(first.status, ShowStatus::Queued);
    assert_eq!(second.status, ShowStatus::Queued);
    assert_eq!(menus.state(first.menu), Some(MenuState::Queued));
    assert_eq!(
        menus.queued().collect::<Vec<_>>(),
        vec![first.menu, second.menu]
    );

    menus.hide_menu(intro).unwrap();
    assert_eq!(menus.active_menus(), &[first.menu]);
    assert_eq!(menus.state(second.menu), Some(MenuState::Queued));

    menus.hide_menu(first.menu).unwrap();
    assert_eq!(menus.active_menus(), &[second.menu]);
    assert!(menus.queue().is_empty());
}

#[test]
fn blocking_menu_drops_unqueued_fullscreen_but_allows_windows() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("intro", BLOCKING, &journal),
        recorder("settings", MenuSettings::new().fullscreen(), &journal),
        recorder("hud", MenuSettings::new(), &journal),
    ]);

    let intro = menus.show_menu("intro", none()).unwrap().menu;
    let settings = menus.show_menu("settings", none()).unwrap();
    let hud = menus.show_menu("hud", none()).unwrap();

    assert_eq!(settings.status, ShowStatus::Dropped);
    assert_eq!(menus.state(settings.menu), Some(MenuState::Pooled));
    assert_eq!(journal.count(Hook::Show("settings")), 0);
    assert!(hud.is_shown());
    assert_eq!(menus.active_menus(), &[intro, hud.menu]);
    assert!(menus.queue().is_empty());
}

#[test]
fn fullscreen_menus_hide_what_the_policy_selects() {
    let journal = Journal::default();
    let templates = || {
        [
            recorder("window", MenuSettings::new(), &journal),
            recorder("options", MenuSettings::new().fullscreen(), &journal),
        ]
    };

    let mut menus = controller(templates());
    let window = menus.show_menu("window", none()).unwrap().menu;
    let options = menus.show_menu("options", none()).unwrap().menu;
    assert_eq!(menus.state(window), Some(MenuState::Pooled));
    assert_eq!(menus.active_menus(), &[options]);

    let mut menus = MenuController::with_config(
        MenuControllerConfig::default().with_policy(FullscreenPolicy::HideFullscreenOnly),
        MenuRegistry::from_templates(templates()).unwrap(),
        HostCommands::default(),
    );
    let window = menus.show_menu("window", none()).unwrap().menu;
    let options = menus.show_menu("options", none()).unwrap().menu;
    assert_eq!(menus.state(window), Some(MenuState::Visible));
    assert_eq!(menus.active_menus(), &[window, options]);
}

#[test]
fn fullscreen_show_leaves_the_queue_alone_while_hiding_others() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("intro", BLOCKING, &journal),
        recorder("credits", MenuSettings::new().fullscreen().queued(), &journal),
        recorder("window", MenuSettings::new(), &journal),
        recorder("options", MenuSettings::new().fullscreen(), &journal),
    ]);

    let intro = menus.show_menu("intro", none()).unwrap().menu;
    let credits = menus.show_menu("credits", none()).unwrap().menu;
    let window = menus.show_menu("window", none()).unwrap().menu;
    menus.hide_menu(intro).unwrap();
    assert_eq!(menus.active_menus(), &[window]);
    assert_eq!(menus.state(credits), Some(MenuState::Queued));

    let options = menus.show_menu("options", none()).unwrap();
    assert!(options.is_shown());
    assert_eq!(menus.state(window), Some(MenuState::Pooled));
    assert_eq!(menus.active_menus(), &[options.menu]);
    assert_eq!(menus.state(credits), Some(MenuState::Queued));
    assert_eq!(journal.count(Hook::Show("credits")), 0);
}

#[test]
fn parent_hides_only_after_every_popup_finished() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("dialog", MenuSettings::new(), &journal),
        recorder_with("note", MenuSettings::new(), &journal, Recorder::deferred),
    ]);

    let dialog = menus.show_menu("dialog", none()).unwrap().menu;
    let notes: Vec<_> = (0..3)
        .map(|_| menus.add_popup_to(dialog, "note", none()).unwrap())
        .collect();
    journal.take();

    assert!(menus.hide_menu(dialog).unwrap());
    assert_eq!(menus.state(dialog), Some(MenuState::HidingChildren));
    assert_eq!(journal.take(), vec![Hook::Hide("note"); 3]);

    menus.complete_hide(notes[0]).unwrap();
    menus.complete_hide(notes[1]).unwrap();
    assert_eq!(menus.state(dialog), Some(MenuState::HidingChildren));
    assert_eq!(menus.menu(dialog).unwrap().children(), &[notes[2]]);
    assert!(journal.take().is_empty());

    menus.complete_hide(notes[2]).unwrap();
    assert_eq!(journal.take(), vec![Hook::Hide("dialog")]);
    assert_eq!(menus.state(dialog), Some(MenuState::Pooled));
    assert!(
        notes
            .iter()
            .all(|note| menus.state(*note) == Some(MenuState::Pooled))
    );
}

#[test]
fn hiding_twice_runs_the_hide_once() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("window", MenuSettings::new(), &journal),
        recorder_with("fader", MenuSettings::new(), &journal, Recorder::deferred),
    ]);

    let window = menus.show_menu("window", none()).unwrap().menu;
    assert_eq!(menus.hide_menu(window), Ok(true));
    assert_eq!(menus.hide_menu(window), Ok(false));
    assert_eq!(journal.count(Hook::Hide("window")), 1);

    let fader = menus.show_menu("fader", none()).unwrap().menu;
    assert_eq!(menus.hide_menu(fader), Ok(true));
    assert_eq!(menus.state(fader), Some(MenuState::Hiding));
    assert_eq!(menus.hide_menu(fader), Ok(false));
    assert_eq!(journal.count(Hook::Hide("fader")), 1);

    menus.complete_hide(fader).unwrap();
    assert!(matches!(
        menus.complete_hide(fader),
        Err(MenuError::InvalidState {
            state: MenuState::Pooled,
            ..
        })
    ));
}

#[test]
fn queued_menu_shows_exactly_once_after_the_blocker_hides() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("a", BLOCKING, &journal),
        recorder("b", MenuSettings::new().fullscreen().queued(), &journal),
    ]);

    let a = menus.show_menu("a", none()).unwrap().menu;
    let b = menus.show_menu("b", none()).unwrap();
    assert_eq!(b.status, ShowStatus::Queued);
    assert_eq!(journal.count(Hook::Show("b")), 0);

    menus.hide_menu(a).unwrap();
    assert_eq!(journal.count(Hook::Show("b")), 1);
    assert_eq!(menus.active_menus(), &[b.menu]);
    assert_eq!(menus.outside_click_target(), Some(b.menu));

    menus.hide_menu(b.menu).unwrap();
    assert_eq!(journal.count(Hook::Show("b")), 1);
    assert!(!menus.any_menu_active());
}

#[test]
fn popup_chain_retargets_and_cascades() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("main", MenuSettings::new(), &journal),
        recorder("popup", MenuSettings::new(), &journal),
        recorder_with(
            "nested",
            MenuSettings::new(),
            &journal,
            Recorder::closes_on_outside,
        ),
    ]);

    let main = menus.show_menu("main", none()).unwrap().menu;
    let p1 = menus.add_popup_to(main, "popup", none()).unwrap();
    let p2 = menus.add_popup_to(p1, "nested", none()).unwrap();
    assert_eq!(menus.stack(), &[main, p1, p2]);
    assert_eq!(menus.menu(p2).unwrap().parent(), Some(p1));
    assert_eq!(menus.outside_click_target(), Some(p2));
    assert_eq!(menus.active_menus(), &[main]);

    assert!(menus.click_outside());
    assert_eq!(menus.outside_click_target(), Some(p1));
    assert!(menus.menu(p1).unwrap().children().is_empty());

    let p2 = menus.add_popup_to(p1, "nested", none()).unwrap();
    journal.take();
    menus.hide_menu(main).unwrap();

    assert_eq!(
        journal.take(),
        vec![Hook::Hide("nested"), Hook::Hide("popup"), Hook::Hide("main")]
    );
    assert_eq!(menus.outside_click_target(), None);
    assert!(menus.stack().is_empty());
    for menu in [main, p1, p2] {
        assert_eq!(menus.state(menu), Some(MenuState::Pooled));
        assert_eq!(menus.menu(menu).unwrap().parent(), None);
    }
}

#[test]
fn removing_a_popup_keeps_its_siblings() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("main", MenuSettings::new(), &journal),
        recorder("popup", MenuSettings::new(), &journal),
        recorder("hint", MenuSettings::new(), &journal),
    ]);

    let main = menus.show_menu("main", none()).unwrap().menu;
    let other = menus.show_menu("main", none()).unwrap().menu;
    let first = menus.add_popup_to(main, "popup", none()).unwrap();
    let hint = menus.add_popup_to(main, "hint", none()).unwrap();
    let second = menus.add_popup_to(main, "popup", none()).unwrap();

    assert_eq!(
        menus.remove_popup(other, first),
        Err(MenuError::NotAChild {
            parent: other,
            child: first
        })
    );
    assert_eq!(menus.remove_popup(main, hint), Ok(true));
    assert_eq!(menus.outside_click_target(), Some(main));
    assert_eq!(menus.menu(main).unwrap().children(), &[first, second]);
    assert_eq!(menus.remove_popups_with_id(main, "popup"), Ok(2));
    assert!(menus.menu(main).unwrap().children().is_empty());
    assert!([first, second, hint]
        .iter()
        .all(|popup| menus.state(*popup) == Some(MenuState::Pooled)));
}

#[test]
fn rejected_payload_leaves_the_controller_untouched() {
    let journal = Journal::default();
    let mut menus = controller([recorder_with(
        "greeter",
        MenuSettings::new(),
        &journal,
        Recorder::strict,
    )]);

    let result = menus.show_menu("greeter", MenuPayload::new(42_u32));

    assert!(matches!(
        result,
        Err(MenuError::InvalidPayload { found: "u32", .. })
    ));
    assert!(!menus.any_menu_active());
    assert!(menus.stack().is_empty());
    assert_eq!(menus.outside_click_target(), None);
    assert!(menus.menus().all(|menu| menu.state() == MenuState::Pooled));
    assert_eq!(journal.count(Hook::Show("greeter")), 0);

    let shown = menus
        .show_menu("greeter", MenuPayload::new(Greeting("hi")))
        .unwrap();
    assert_eq!(
        menus.behaviour::<Recorder>(shown.menu).unwrap().greeting,
        Some(Greeting("hi"))
    );
}

#[test]
fn unknown_identifiers_change_nothing() {
    let mut menus = MenuController::new(MenuRegistry::new(), HostCommands::default());

    assert_eq!(
        menus.show_menu("missing", none()),
        Err(MenuError::UnknownIdentifier(MenuId::new("missing")))
    );
    assert_eq!(
        menus.add_popup("missing", true, none()),
        Err(MenuError::UnknownIdentifier(MenuId::new("missing")))
    );
    assert!(menus.host().is_empty());
    assert_eq!(menus.menus().count(), 0);
}

#[test]
fn menus_cannot_change_controllers() {
    let journal = Journal::default();
    let mut ours = controller([recorder("window", MenuSettings::new(), &journal)]);
    let mut theirs = controller([recorder("window", MenuSettings::new(), &journal)]);

    let foreign = theirs.get_menu("window").unwrap();
    assert_eq!(
        ours.show(foreign, none()),
        Err(MenuError::DoubleOwnership {
            menu: foreign,
            owner: theirs.id(),
            claimant: ours.id(),
        })
    );
    assert!(ours.hide_menu(foreign).is_err());
    assert_eq!(
        theirs.show(foreign, none()).map(|outcome| outcome.status),
        Ok(ShowStatus::Shown)
    );
}

#[test]
fn remove_all_popups_calls_back_once_after_the_last_hide() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("dialog", MenuSettings::new(), &journal),
        recorder_with("note", MenuSettings::new(), &journal, Recorder::deferred),
    ]);
    let fired = Arc::new(AtomicUsize::new(0));

    let dialog = menus.show_menu("dialog", none()).unwrap().menu;
    let counter = fired.clone();
    menus
        .remove_all_popups(dialog, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    let notes = [
        menus.add_popup_to(dialog, "note", none()).unwrap(),
        menus.add_popup_to(dialog, "note", none()).unwrap(),
    ];
    let counter = fired.clone();
    menus
        .remove_all_popups(dialog, move |parent| {
            assert_eq!(parent, dialog);
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    menus.complete_hide(notes[0]).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    menus.complete_hide(notes[1]).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert_eq!(menus.state(dialog), Some(MenuState::Visible));
    assert_eq!(menus.outside_click_target(), Some(dialog));
}

#[test]
fn popups_attach_to_the_oldest_active_menu() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("window", MenuSettings::new(), &journal),
        recorder("tooltip", MenuSettings::new(), &journal),
    ]);

    assert_eq!(
        menus.add_popup("tooltip", false, none()),
        Ok(PopupOutcome::Dropped)
    );
    assert_eq!(menus.menus().count(), 0);

    let Ok(PopupOutcome::Promoted(promoted)) = menus.add_popup("tooltip", true, none()) else {
        panic!("tooltip should have been shown on its own");
    };
    assert!(promoted.is_shown());
    assert_eq!(menus.menu(promoted.menu).unwrap().parent(), None);

    menus.show_menu("window", none()).unwrap();
    let Ok(PopupOutcome::Attached { parent, popup }) = menus.add_popup("tooltip", false, none())
    else {
        panic!("tooltip should have been attached");
    };
    assert_eq!(parent, promoted.menu);
    assert_eq!(menus.menu(popup).unwrap().parent(), Some(promoted.menu));
}

#[test]
fn always_on_top_menus_stay_above_and_latest_wins() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("overlay", MenuSettings::new().always_on_top(), &journal),
        recorder("window", MenuSettings::new(), &journal),
    ]);

    let first_overlay = menus.show_menu("overlay", none()).unwrap().menu;
    let window = menus.show_menu("window", none()).unwrap().menu;
    assert_eq!(menus.stack(), &[window, first_overlay]);

    let second_overlay = menus.show_menu("overlay", none()).unwrap().menu;
    let second_window = menus.show_menu("window", none()).unwrap().menu;
    assert_eq!(
        menus.stack(),
        &[window, second_window, first_overlay, second_overlay]
    );
    assert_eq!(menus.topmost(), Some(second_overlay));
    assert_eq!(
        menus.host().iter().last(),
        Some(&HostCommand::OutsideClick(Some(OutsideClickTarget {
            menu: second_window,
            blocks_input: true,
        })))
    );
}

#[test]
fn popups_stay_above_an_always_on_top_parent() {
    let mut menus = controller([
        MenuTemplate::plain("hud", MenuSettings::new().always_on_top()),
        MenuTemplate::plain("popup", MenuSettings::new()),
        MenuTemplate::plain("window", MenuSettings::new()),
    ]);

    let hud = menus.show_menu("hud", none()).unwrap().menu;
    let popup = menus.add_popup_to(hud, "popup", none()).unwrap();
    assert_eq!(menus.stack(), &[hud, popup]);
    assert_eq!(menus.topmost(), Some(popup));
    assert_eq!(menus.outside_click_target(), Some(popup));

    let window = menus.show_menu("window", none()).unwrap().menu;
    assert_eq!(menus.stack(), &[window, hud, popup]);
    assert_eq!(menus.topmost(), Some(popup));
}

#[test]
fn outside_clicks_respect_the_menu_and_its_input_flag() {
    let journal = Journal::default();
    let mut menus = controller([recorder(
        "hint",
        MenuSettings::new().passthrough_outside(),
        &journal,
    )]);

    assert!(!menus.click_outside());
    let hint = menus.show_menu("hint", none()).unwrap().menu;
    let last_target = menus.host().iter().rev().find_map(|command| match command {
        HostCommand::OutsideClick(target) => Some(*target),
        _ => None,
    });
    assert_eq!(
        last_target,
        Some(Some(OutsideClickTarget {
            menu: hint,
            blocks_input: false,
        }))
    );

    assert!(!menus.click_outside());
    assert_eq!(menus.state(hint), Some(MenuState::Visible));
    assert_eq!(menus.drag(hint, DragPhase::Begin, Vec2::ONE), Ok(false));
    assert_eq!(menus.pointer_left(hint), Ok(false));
}

#[test]
fn toggling_flips_between_shown_and_hidden() {
    let journal = Journal::default();
    let mut menus = controller([recorder("inventory", MenuSettings::new(), &journal)]);

    let Ok(Toggled::Shown(shown)) = menus.toggle_menu("inventory", none()) else {
        panic!("first toggle should show");
    };
    assert_eq!(menus.active_menu("inventory"), Some(shown.menu));
    assert_eq!(
        menus.toggle_menu("inventory", none()),
        Ok(Toggled::Hidden(shown.menu))
    );
    assert_eq!(menus.active_menu("inventory"), None);
}

#[test]
fn toggling_a_menu_that_is_still_hiding_shows_a_new_one() {
    let journal = Journal::default();
    let mut menus = controller([recorder_with(
        "fader",
        MenuSettings::new(),
        &journal,
        Recorder::deferred,
    )]);

    let fading = menus.show_menu("fader", none()).unwrap().menu;
    assert!(menus.hide_menu(fading).unwrap());
    assert_eq!(menus.state(fading), Some(MenuState::Hiding));

    let Ok(Toggled::Shown(shown)) = menus.toggle_menu("fader", none()) else {
        panic!("a hiding menu should not be toggled off again");
    };
    assert!(shown.is_shown());
    assert_ne!(shown.menu, fading);
    assert_eq!(menus.state(fading), Some(MenuState::Hiding));
    assert_eq!(journal.count(Hook::Hide("fader")), 1);
}

#[test]
fn hide_callbacks_wait_for_deferred_hides() {
    let journal = Journal::default();
    let mut menus = controller([recorder_with(
        "fader",
        MenuSettings::new(),
        &journal,
        Recorder::deferred,
    )]);
    let fired = Arc::new(AtomicUsize::new(0));

    let fader = menus.show_menu("fader", none()).unwrap().menu;
    let counter = fired.clone();
    assert_eq!(
        menus.hide_menu_and_call(fader, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
        Ok(true)
    );
    let counter = fired.clone();
    assert_eq!(
        menus.hide_menu_and_call(fader, move |_| {
            counter.fetch_add(10, Ordering::SeqCst);
        }),
        Ok(true)
    );
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    menus.complete_hide(fader).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 11);
    assert_eq!(menus.hide_menu_and_call(fader, |_| {}), Ok(false));
}

#[test]
fn cancelled_requests_never_show() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("intro", BLOCKING, &journal),
        recorder("credits", MenuSettings::new().fullscreen().queued(), &journal),
    ]);

    let intro = menus.show_menu("intro", none()).unwrap().menu;
    let credits = menus.show_menu("credits", none()).unwrap().menu;
    assert_eq!(menus.cancel_queued(credits), Ok(true));
    assert_eq!(menus.cancel_queued(credits), Ok(false));
    assert_eq!(menus.state(credits), Some(MenuState::Pooled));

    menus.hide_menu(intro).unwrap();
    assert!(!menus.any_menu_active());
    assert_eq!(journal.count(Hook::Show("credits")), 0);
}

#[test]
fn queued_menu_with_a_bad_payload_is_skipped() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("intro", BLOCKING, &journal),
        recorder_with(
            "letter",
            MenuSettings::new().fullscreen().queued(),
            &journal,
            Recorder::strict,
        ),
    ]);

    let intro = menus.show_menu("intro", none()).unwrap().menu;
    let letter = menus
        .show_menu("letter", MenuPayload::new("not a greeting"))
        .unwrap();
    assert_eq!(letter.status, ShowStatus::Queued);

    menus.hide_menu(intro).unwrap();
    assert!(!menus.any_menu_active());
    assert_eq!(menus.state(letter.menu), Some(MenuState::Pooled));
    assert!(menus.queue().is_empty());
}

#[test]
fn unused_instances_can_be_released() {
    let journal = Journal::default();
    let mut menus = controller([recorder("window", MenuSettings::new(), &journal)]);

    let menu = menus.get_menu("window").unwrap();
    assert_eq!(menus.state(menu), Some(MenuState::Inactive));
    menus.release(menu).unwrap();
    assert_eq!(menus.state(menu), Some(MenuState::Pooled));
    assert!(matches!(
        menus.release(menu),
        Err(MenuError::InvalidState { .. })
    ));
    assert_eq!(menus.get_menu("window"), Ok(menu));
}

#[test]
fn blocking_menus_can_be_hidden_on_their_own() {
    let journal = Journal::default();
    let mut menus = controller([
        recorder("window", MenuSettings::new(), &journal),
        recorder("intro", BLOCKING, &journal),
    ]);

    let window = menus.show_menu("window", none()).unwrap().menu;
    let intro = menus.show_menu("intro", none()).unwrap().menu;
    assert_eq!(menus.state(window), Some(MenuState::Pooled));
    assert_eq!(menus.active_menus(), &[intro]);

    let hud = menus.show_menu("window", none()).unwrap().menu;
    menus.hide_all_blocking_menus();
    assert_eq!(menus.active_menus(), &[hud]);
}

#[test]
fn forced_hide_all_switches_surfaces_off_first() {
    let journal = Journal::default();
    let mut menus = controller([recorder("window", MenuSettings::new(), &journal)]);

    menus.show_menu("window", none()).unwrap();
    menus.show_menu("window", none()).unwrap();
    let _ = menus.host_mut().drain().count();
    menus.hide_all_menus(true);

    assert_eq!(menus.host().iter().next(), Some(&HostCommand::HideAll));
    assert!(!menus.any_menu_active());
    assert!(menus.menus().all(|menu| menu.state() == MenuState::Pooled));
    assert_eq!(journal.count(Hook::Hide("window")), 2);
}

#[test]
fn local_templates_shadow_shared_ones() {
    let shared = SharedMenuRegistry::new(
        MenuRegistry::from_templates([
            MenuTemplate::plain("tooltip", MenuSettings::new().fullscreen()),
            MenuTemplate::plain("banner", MenuSettings::new()),
        ])
        .unwrap(),
    );
    let mut menus = MenuController::new(
        MenuRegistry::from_templates([MenuTemplate::plain("tooltip", MenuSettings::new())])
            .unwrap(),
        HostCommands::default(),
    )
    .with_shared_registry(shared.clone());

    let tooltip = menus.show_menu("tooltip", none()).unwrap().menu;
    assert!(!menus.menu(tooltip).unwrap().settings().fullscreen);
    assert!(menus.show_menu("banner", none()).unwrap().is_shown());

    let other = MenuController::new(MenuRegistry::new(), HostCommands::default())
        .with_shared_registry(shared);
    assert!(other.has_template("banner"));
    assert!(!other.has_template("missing"));
    assert_ne!(other.id(), menus.id());
}
