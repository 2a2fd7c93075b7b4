use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use itemkit_core::{
    Containers, Disposition, DragEvent, Host, HotbarSlot, Inventories, Material, MouseButton,
    PlayerId, StackBuilder, StackPayload, StackSnapshot,
};
use itemkit_runtime::{
    ClickBinding, InMemoryHost, ItemService, MenuBuilder, ServiceConfig, ServiceError,
};

fn fixture() -> (Arc<InMemoryHost>, ItemService) {
    let host = Arc::new(InMemoryHost::new());
    let service = ItemService::initialize(
        Host::from_impl(host.clone()),
        ServiceConfig::new("menu tests"),
    );
    (host, service)
}

#[test]
fn locked_item_clicks_run_the_handler_and_cancel() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let clicks = Arc::new(AtomicU32::new(0));
    let counter = clicks.clone();
    let item = service.create_item(StackBuilder::new(Material::Emerald, "button"));
    let menu = service.menu(MenuBuilder::new("desk", 3)).unwrap();
    menu.add_locked_item(
        13,
        &item,
        ClickBinding::both(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    )
    .unwrap();
    menu.add_item(5, StackPayload::new(Material::Stone, "loose"))
        .unwrap();
    menu.open(alice);
    let container = menu.container().unwrap();

    // locked stack: handler runs, interaction suppressed
    let click = host.click_in(alice, container, 13, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
    assert_eq!(clicks.load(Ordering::Relaxed), 1);

    // middle click is still suppressed but runs nothing
    let click = host.click_in(alice, container, 13, MouseButton::Middle, false);
    assert!(service.handle_click(&click).is_cancelled());
    assert_eq!(clicks.load(Ordering::Relaxed), 1);

    // empty slot and plain stack both pass through
    let click = host.click_in(alice, container, 0, MouseButton::Left, false);
    assert!(!service.handle_click(&click).is_cancelled());
    let click = host.click_in(alice, container, 5, MouseButton::Left, false);
    assert!(!service.handle_click(&click).is_cancelled());
}

#[test]
fn separator_fill_touches_only_empty_slots() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let item = service.create_item(StackBuilder::new(Material::Book, "guide"));
    let menu = service.menu(MenuBuilder::new("library", 3)).unwrap();
    menu.add_locked_item(13, &item, ClickBinding::None).unwrap();
    menu.add_item(5, StackPayload::new(Material::Stone, "loose"))
        .unwrap();
    menu.fill_gaps_with_separator().unwrap();

    let separator = service.separator();
    let filled = (0..27)
        .filter_map(|slot| menu.stack_at(slot))
        .filter(|stack| stack.carries(separator.id()))
        .count();
    assert_eq!(filled, 25);
    assert_eq!(menu.stack_at(5).unwrap().payload.title, "loose");
    assert!(menu.stack_at(13).unwrap().carries(item.id()));

    // separator slots are locked but carry no click handler
    let snapshot = StackSnapshot::from(&separator);
    assert!(menu.is_locked(&snapshot));
    assert!(!menu.has_left_click(&snapshot));
    assert!(!menu.has_right_click(&snapshot));
    menu.open(alice);
    let click = host.click_in(alice, menu.container().unwrap(), 0, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
}

#[test]
fn bottom_clicks_guard_locked_stacks_while_the_menu_is_open() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let item = service.create_item(StackBuilder::new(Material::Diamond, "prize"));
    let menu = service.menu(MenuBuilder::new("vault", 1)).unwrap();
    menu.add_locked_item(0, &item, ClickBinding::None).unwrap();
    menu.open(alice);

    // the locked stack also sits in alice's own inventory
    let slot = HotbarSlot::new(2).unwrap();
    host.set_hotbar_stack(alice, slot, Some(StackSnapshot::from(&item)));

    let click = host.click_own_inventory(alice, 2, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
    let click = host.click_own_inventory(alice, 2, MouseButton::Right, true);
    assert!(service.handle_click(&click).is_cancelled());
    let click = host.click_own_inventory(alice, 2, MouseButton::Right, false);
    assert!(!service.handle_click(&click).is_cancelled());

    // once the screen is gone the menu no longer guards anything
    host.player_closes(alice).unwrap();
    let click = host.click_own_inventory(alice, 2, MouseButton::Left, false);
    assert!(!service.handle_click(&click).is_cancelled());
}

#[test]
fn item_updates_repaint_every_matching_slot() {
    let (_, service) = fixture();

    let mut item = service.create_item(StackBuilder::new(Material::Paper, "note"));
    let menu = service.menu(MenuBuilder::new("board", 2)).unwrap();
    menu.add_locked_item(3, &item, ClickBinding::None).unwrap();
    menu.add_locked_item(7, &item, ClickBinding::None).unwrap();
    menu.add_item(0, StackPayload::new(Material::Stone, "loose"))
        .unwrap();

    item.update_title("signed note").update_glint(true);
    service.push_updates(&item);

    for slot in [3, 7] {
        let stack = menu.stack_at(slot).unwrap();
        assert_eq!(stack.payload.title, "signed note");
    }
    assert_eq!(menu.stack_at(0).unwrap().payload.title, "loose");
}

#[test]
fn clearing_an_item_removes_it_from_menus() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let item = service.create_item(StackBuilder::new(Material::Arrow, "ammo"));
    let menu = service.menu(MenuBuilder::new("armory", 1)).unwrap();
    menu.add_locked_item(2, &item, ClickBinding::both(|_| {}))
        .unwrap();
    menu.add_locked_item(6, &item, ClickBinding::None).unwrap();

    service.clear_item(&item);

    assert!(menu.stack_at(2).is_none());
    assert!(menu.stack_at(6).is_none());
    assert!(!menu.is_locked(&StackSnapshot::from(&item)));

    // a stale stack bearing the cleared identity no longer matches
    menu.open(alice);
    let mut stale = host.click_in(alice, menu.container().unwrap(), 2, MouseButton::Left, false);
    stale.stack = Some(StackSnapshot::from(&item));
    assert!(!service.handle_click(&stale).is_cancelled());
}

#[test]
fn swap_carries_lock_and_callbacks_to_the_replacement() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let clicks = Arc::new(AtomicU32::new(0));
    let counter = clicks.clone();
    let old = service.create_item(StackBuilder::new(Material::Compass, "v1"));
    let new = service.create_item(StackBuilder::new(Material::Clock, "v2"));
    let menu = service.menu(MenuBuilder::new("gadgets", 1)).unwrap();
    menu.add_locked_item(
        4,
        &old,
        ClickBinding::both(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    )
    .unwrap();

    menu.swap_item(&old, &new);

    assert!(menu.stack_at(4).unwrap().carries(new.id()));
    assert!(!menu.is_locked(&StackSnapshot::from(&old)));
    assert!(menu.is_locked(&StackSnapshot::from(&new)));

    menu.open(alice);
    let click = host.click_in(alice, menu.container().unwrap(), 4, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
    assert_eq!(clicks.load(Ordering::Relaxed), 1);
}

#[test]
fn swapping_the_separator_out_keeps_it_locked_for_other_menus() {
    let (_, service) = fixture();
    let separator = service.separator();

    let first = service.menu(MenuBuilder::new("first", 1)).unwrap();
    let second = service.menu(MenuBuilder::new("second", 1)).unwrap();
    first.fill_gaps_with_separator().unwrap();
    second.fill_gaps_with_separator().unwrap();

    let replacement = service.create_item(StackBuilder::new(Material::Stone, "wall"));
    first.swap_item(&separator, &replacement);

    for slot in 0..9 {
        assert!(first.stack_at(slot).unwrap().carries(replacement.id()));
        assert!(second.stack_at(slot).unwrap().carries(separator.id()));
    }
    // the replacement is locked, and the separator identity stays locked
    assert!(first.is_locked(&StackSnapshot::from(&replacement)));
    assert!(first.is_locked(&StackSnapshot::from(&separator)));
    assert!(second.is_locked(&StackSnapshot::from(&separator)));
}

#[test]
fn removed_items_stop_handling_clicks() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let clicks = Arc::new(AtomicU32::new(0));
    let counter = clicks.clone();
    let item = service.create_item(StackBuilder::new(Material::Emerald, "button"));
    let menu = service.menu(MenuBuilder::new("desk", 1)).unwrap();
    menu.add_locked_item(
        4,
        &item,
        ClickBinding::both(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    )
    .unwrap();
    menu.open(alice);
    let container = menu.container().unwrap();

    let click = host.click_in(alice, container, 4, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
    assert_eq!(clicks.load(Ordering::Relaxed), 1);

    menu.remove_item(&item);

    assert!(menu.stack_at(4).is_none());
    // even a stale stack carrying the removed identity passes through
    let mut stale = host.click_in(alice, container, 4, MouseButton::Left, false);
    stale.stack = Some(StackSnapshot::from(&item));
    assert!(!service.handle_click(&stale).is_cancelled());
    assert_eq!(clicks.load(Ordering::Relaxed), 1);
}

#[test]
fn remove_item_never_unlocks_the_separator() {
    let (_, service) = fixture();
    let separator = service.separator();

    let menu = service.menu(MenuBuilder::new("desk", 1)).unwrap();
    menu.fill_gaps_with_separator().unwrap();
    menu.remove_item(&separator);

    // slots are emptied, but the separator identity stays locked
    assert!(menu.stack_at(0).is_none());
    assert!(menu.is_locked(&StackSnapshot::from(&separator)));

    menu.add_separator(0).unwrap();
    assert!(menu.stack_at(0).unwrap().carries(separator.id()));
}

#[test]
fn dispatcher_skips_menus_that_do_not_match() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    let bob = PlayerId(2);
    host.connect(alice);
    host.connect(bob);

    let first_clicks = Arc::new(AtomicU32::new(0));
    let second_clicks = Arc::new(AtomicU32::new(0));

    let first = service.menu(MenuBuilder::new("first", 1)).unwrap();
    let item = service.create_item(StackBuilder::new(Material::Stone, "a"));
    let counter = first_clicks.clone();
    first
        .add_locked_item(
            0,
            &item,
            ClickBinding::both(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        )
        .unwrap();

    let second = service.menu(MenuBuilder::new("second", 1)).unwrap();
    let other = service.create_item(StackBuilder::new(Material::Stone, "b"));
    let counter = second_clicks.clone();
    second
        .add_locked_item(
            0,
            &other,
            ClickBinding::both(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        )
        .unwrap();

    // each player looks at a different menu; bob's click stays in his
    first.open(alice);
    second.open(bob);
    let click = host.click_in(bob, second.container().unwrap(), 0, MouseButton::Left, false);
    assert!(service.handle_click(&click).is_cancelled());
    assert_eq!(first_clicks.load(Ordering::Relaxed), 0);
    assert_eq!(second_clicks.load(Ordering::Relaxed), 1);
}

#[test]
fn close_hooks_fire_for_the_exact_container_only() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let first_closes = Arc::new(AtomicU32::new(0));
    let second_closes = Arc::new(AtomicU32::new(0));

    let counter = first_closes.clone();
    let _first = service
        .menu(MenuBuilder::new("first", 1).on_close(move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();
    let counter = second_closes.clone();
    let second = service
        .menu(MenuBuilder::new("second", 1).on_close(move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();

    second.open(alice);
    let close = host.player_closes(alice).unwrap();
    service.handle_close(&close);

    assert_eq!(first_closes.load(Ordering::Relaxed), 0);
    assert_eq!(second_closes.load(Ordering::Relaxed), 1);
}

#[test]
fn click_hooks_replace_the_default_handling() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let clicks = Arc::new(AtomicU32::new(0));
    let hook_runs = Arc::new(AtomicU32::new(0));

    let counter = hook_runs.clone();
    let menu = service
        .menu(MenuBuilder::new("custom", 1).on_click(move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
            Disposition::Pass
        }))
        .unwrap();
    let item = service.create_item(StackBuilder::new(Material::Emerald, "button"));
    let counter = clicks.clone();
    menu.add_locked_item(
        0,
        &item,
        ClickBinding::both(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    )
    .unwrap();

    menu.open(alice);
    let click = host.click_in(alice, menu.container().unwrap(), 0, MouseButton::Left, false);
    // the hook decided Pass; the locked-item default never ran
    assert!(!service.handle_click(&click).is_cancelled());
    assert_eq!(hook_runs.load(Ordering::Relaxed), 1);
    assert_eq!(clicks.load(Ordering::Relaxed), 0);
}

#[test]
fn drags_pass_unless_a_hook_cancels_them() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let plain = service.menu(MenuBuilder::new("plain", 1)).unwrap();
    plain.open(alice);
    let drag = DragEvent {
        player: alice,
        container: plain.container(),
        top: plain.container(),
        slots: vec![0, 1],
    };
    assert!(!service.handle_drag(&drag).is_cancelled());
    host.player_closes(alice);

    let guarded = service
        .menu(MenuBuilder::new("guarded", 1).on_drag(|_, _| Disposition::Cancel))
        .unwrap();
    guarded.open(alice);
    let drag = DragEvent {
        player: alice,
        container: guarded.container(),
        top: guarded.container(),
        slots: vec![0],
    };
    assert!(service.handle_drag(&drag).is_cancelled());
}

#[test]
fn cleared_menus_refuse_placement_and_report_closed() {
    let (host, service) = fixture();
    let alice = PlayerId(1);
    host.connect(alice);

    let menu = service.menu(MenuBuilder::new("popup", 1)).unwrap();
    menu.open(alice);
    assert!(menu.is_open());
    assert_eq!(menu.viewer_count(), 1);

    menu.clear();

    assert!(!menu.is_open());
    assert_eq!(menu.viewer_count(), 0);
    assert_eq!(host.open_container_of(alice), None);
    assert!(matches!(
        menu.add_item(0, StackPayload::new(Material::Stone, "late")),
        Err(ServiceError::MenuClosed)
    ));
    // clearing again is a quiet no-op
    menu.clear();
}

#[test]
fn slot_bounds_are_checked_on_placement() {
    let (_, service) = fixture();
    let menu = service.menu(MenuBuilder::new("strip", 1)).unwrap();
    assert!(matches!(
        menu.add_item(9, StackPayload::new(Material::Stone, "off the end")),
        Err(ServiceError::SlotOutOfRange { slot: 9, size: 9 })
    ));
    assert!(menu.add_separator(8).is_ok());
}
