//! End-to-end walkthrough over the in-memory host: a menu handing out a
//! shared hotbar clock, a count-up usage policy, and a self-charging
//! refresh item.
//!
//! Run with `RUST_LOG=debug` to watch the service's internal dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use itemkit_core::{
    Host, HotbarSlot, Inventories, Material, MouseButton, PlayerId, StackBuilder, StackSnapshot,
    Ticks,
};
use itemkit_runtime::{
    ClickBinding, HotbarItemBuilder, InMemoryHost, ItemService, MenuBuilder, ServiceConfig,
};

fn show(stack: Option<StackSnapshot>) -> String {
    match stack {
        Some(stack) => format!("{} x{}", stack.payload.title, stack.payload.count),
        None => "empty".to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let host = Arc::new(InMemoryHost::new());
    let service = ItemService::initialize(
        Host::from_impl(host.clone()),
        ServiceConfig::new("counter demo"),
    );

    let alice = PlayerId(1);
    let bob = PlayerId(2);
    host.connect(alice);
    host.connect(bob);

    // shared clock: every use counts up to 12 and wraps back to 1
    let clock = service.hotbar_item(
        HotbarItemBuilder::new(service.create_item(
            StackBuilder::new(Material::Clock, "Shift Clock").lore_line("use to advance the shift"),
        ))
        .slot(HotbarSlot::FIRST)
        .on_right_click(|player, stack| {
            println!("  -> {} advanced the shift (was {})", player, stack.payload().count);
        })
        .count_up_on_use(12),
    );

    // menu: one button hands the clock out, right click takes it back
    let menu = service.menu(MenuBuilder::new("Shift Desk", 3))?;
    let button = service.create_item(
        StackBuilder::new(Material::Emerald, "Clock Desk")
            .lore_line("left: take a clock")
            .lore_line("right: hand every clock back")
            .glint(true),
    );
    let take = clock.clone();
    let retire = clock.clone();
    menu.add_locked_item(
        13,
        &button,
        ClickBinding::Split {
            left: Some(Arc::new(move |player| take.give_to(player))),
            right: Some(Arc::new(move |_| retire.remove_from_everyone())),
        },
    )?;
    menu.fill_gaps_with_separator()?;

    // alice takes a clock through the menu, bob gets one directly
    menu.open(alice);
    let container = menu.container().context("menu has no container")?;
    let click = host.click_in(alice, container, 13, MouseButton::Left, false);
    service.handle_click(&click);
    clock.give_to(bob);
    println!("alice: {}", show(host.hotbar_stack(alice, HotbarSlot::FIRST)));
    println!("bob:   {}", show(host.hotbar_stack(bob, HotbarSlot::FIRST)));

    // three uses by alice; bob's copy follows the shared count
    for _ in 0..3 {
        let event = host.interact(alice, MouseButton::Right);
        service.handle_interact(&event);
    }
    println!("after three uses:");
    println!("alice: {}", show(host.hotbar_stack(alice, HotbarSlot::FIRST)));
    println!("bob:   {}", show(host.hotbar_stack(bob, HotbarSlot::FIRST)));

    // a crystal that charges itself on a schedule, wrapping past 5
    let charge_slot = HotbarSlot::try_from(8)?;
    let crystal = service.refreshing_hotbar_item(
        HotbarItemBuilder::new(
            service.create_item(StackBuilder::new(Material::Diamond, "Charging Crystal")),
        )
        .slot(charge_slot)
        .count_up_on_use(5),
    );
    crystal
        .set_refresh_interval(Ticks(10))
        .set_refresh_effect(|item| item.increase_count());
    crystal.item().give_to_everyone();
    crystal.start_refreshing();

    host.advance(Ticks(31));
    println!(
        "crystal after 31 ticks: {}",
        show(host.hotbar_stack(alice, charge_slot))
    );
    host.advance(Ticks(10));
    println!(
        "crystal after 41 ticks: {} (wrapped)",
        show(host.hotbar_stack(alice, charge_slot))
    );

    println!("{}", service.status_report());

    service.shutdown();
    println!(
        "after shutdown, alice: {}",
        show(host.hotbar_stack(alice, HotbarSlot::FIRST))
    );
    Ok(())
}
