use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use winden_core::ThemeMode;
use winden_platform::{MediaQuery, MemoryHost};
use winden_theme::{ThemeContext, THEME_ATTRIBUTE, THEME_STORAGE_KEY};

fn context_over(host: &MemoryHost) -> ThemeContext {
    ThemeContext::new(Arc::new(host.clone()))
}

fn counting_listener(counter: &Arc<AtomicUsize>) -> impl Fn(ThemeMode) + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn persisted_preference_dominates_dom_and_os_signals() {
    let host = MemoryHost::new();
    host.seed_stored(THEME_STORAGE_KEY, "contrast");
    host.seed_root_attribute(THEME_ATTRIBUTE, "light");
    host.set_media(MediaQuery::PrefersDark, true);

    let resolution = context_over(&host).resolve_boot_theme();
    assert_eq!(resolution.theme, ThemeMode::Contrast);
    assert_eq!(resolution.persisted, Some(ThemeMode::Contrast));
}

#[test]
fn dom_attribute_wins_when_nothing_is_persisted() {
    let host = MemoryHost::new();
    host.seed_root_attribute(THEME_ATTRIBUTE, "dark");
    host.set_media(MediaQuery::PrefersLight, true);

    let resolution = context_over(&host).resolve_boot_theme();
    assert_eq!(resolution.theme, ThemeMode::Dark);
    assert_eq!(resolution.persisted, None);
}

#[test]
fn forced_colors_beats_prefers_color_scheme() {
    let host = MemoryHost::new();
    host.set_media(MediaQuery::ForcedColors, true);
    host.set_media(MediaQuery::PrefersDark, true);

    let resolution = context_over(&host).resolve_boot_theme();
    assert_eq!(resolution.theme, ThemeMode::Contrast);
    assert_eq!(resolution.persisted, None);
}

#[test]
fn os_dark_preference_resolves_through_current_theme() {
    let host = MemoryHost::new();
    host.set_media(MediaQuery::PrefersDark, true);

    let ctx = context_over(&host);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);
}

#[test]
fn current_theme_read_has_no_side_effects() {
    let host = MemoryHost::new();
    host.set_media(MediaQuery::PrefersDark, true);

    let ctx = context_over(&host);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);

    assert_eq!(host.root_attribute(THEME_ATTRIBUTE), None);
    assert_eq!(host.stored(THEME_STORAGE_KEY), None);
    assert_eq!(host.attribute_write_count(), 0);
    assert_eq!(host.storage_write_count(), 0);
}

#[test]
fn everything_falls_back_to_light_on_a_headless_host() {
    let host = MemoryHost::headless();
    let ctx = context_over(&host);

    ctx.initialize();
    assert_eq!(ctx.current_theme(), ThemeMode::Light);

    // All operations degrade silently.
    ctx.set_theme(ThemeMode::Dark);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);
    assert_eq!(ctx.token_value("color.text.primary"), None);
    ctx.update_tokens([("color.text.primary", "#ffffff")]);
    ctx.clear_preference();
    ctx.shutdown();
}

#[test]
fn set_theme_updates_cache_and_root_attribute() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    ctx.set_theme(ThemeMode::Dark);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);
    assert_eq!(
        host.root_attribute(THEME_ATTRIBUTE),
        Some("dark".to_string())
    );
    assert_eq!(host.stored(THEME_STORAGE_KEY), Some("dark".to_string()));
}

#[test]
fn redundant_set_theme_is_a_complete_no_op() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    let notifications = Arc::new(AtomicUsize::new(0));
    let _sub = ctx.subscribe(counting_listener(&notifications));

    ctx.set_theme(ThemeMode::Dark);
    let attribute_writes = host.attribute_write_count();
    let storage_writes = host.storage_write_count();
    assert_eq!(notifications.load(Ordering::SeqCst), 1);

    ctx.set_theme(ThemeMode::Dark);
    assert_eq!(host.attribute_write_count(), attribute_writes);
    assert_eq!(host.storage_write_count(), storage_writes);
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn initialize_twice_boots_exactly_once() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);

    let notifications = Arc::new(AtomicUsize::new(0));
    let _sub = ctx.subscribe(counting_listener(&notifications));

    ctx.initialize();
    assert!(ctx.is_initialized());
    assert_eq!(host.attribute_write_count(), 1);
    assert_eq!(host.media_watcher_count(), 3);

    ctx.initialize();
    assert_eq!(host.attribute_write_count(), 1);
    assert_eq!(host.storage_write_count(), 0);
    assert_eq!(host.media_watcher_count(), 3);
    // Boot is silent both times.
    assert_eq!(notifications.load(Ordering::SeqCst), 0);
}

#[test]
fn persisted_boot_overrides_preset_markup_without_a_confirmation_write() {
    let host = MemoryHost::new();
    host.seed_stored(THEME_STORAGE_KEY, "contrast");
    host.seed_root_attribute(THEME_ATTRIBUTE, "light");

    let ctx = context_over(&host);
    ctx.initialize();

    assert_eq!(ctx.current_theme(), ThemeMode::Contrast);
    assert_eq!(
        host.root_attribute(THEME_ATTRIBUTE),
        Some("contrast".to_string())
    );
    // The resolver's persisted value flows through as the stored hint, so
    // the already-correct store is not rewritten.
    assert_eq!(host.storage_write_count(), 0);
}

#[test]
fn boot_is_silent_and_first_change_notifies_once() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    let received = Arc::new(Mutex::new(Vec::new()));
    let received_in_listener = Arc::clone(&received);
    let _sub = ctx.subscribe(move |mode| {
        received_in_listener.lock().unwrap().push(mode);
    });

    assert!(received.lock().unwrap().is_empty());
    ctx.set_theme(ThemeMode::Contrast);
    assert_eq!(*received.lock().unwrap(), vec![ThemeMode::Contrast]);
}

#[test]
fn pinned_preference_ignores_os_appearance_changes() {
    let host = MemoryHost::new();
    host.seed_stored(THEME_STORAGE_KEY, "light");

    let ctx = context_over(&host);
    ctx.initialize();

    let notifications = Arc::new(AtomicUsize::new(0));
    let _sub = ctx.subscribe(counting_listener(&notifications));

    host.set_media(MediaQuery::PrefersDark, true);
    assert_eq!(ctx.current_theme(), ThemeMode::Light);
    assert_eq!(
        host.root_attribute(THEME_ATTRIBUTE),
        Some("light".to_string())
    );
    assert_eq!(notifications.load(Ordering::SeqCst), 0);
}

#[test]
fn os_changes_are_followed_and_never_persisted_while_unpinned() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    let received = Arc::new(Mutex::new(Vec::new()));
    let received_in_listener = Arc::clone(&received);
    let _sub = ctx.subscribe(move |mode| {
        received_in_listener.lock().unwrap().push(mode);
    });

    host.set_media(MediaQuery::PrefersDark, true);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);
    assert_eq!(
        host.root_attribute(THEME_ATTRIBUTE),
        Some("dark".to_string())
    );
    assert_eq!(*received.lock().unwrap(), vec![ThemeMode::Dark]);
    assert_eq!(host.stored(THEME_STORAGE_KEY), None);

    // Signal clears again: back to the light fallback.
    host.set_media(MediaQuery::PrefersDark, false);
    assert_eq!(ctx.current_theme(), ThemeMode::Light);
    assert_eq!(
        *received.lock().unwrap(),
        vec![ThemeMode::Dark, ThemeMode::Light]
    );
}

#[test]
fn corrupt_persisted_value_is_removed_and_resolution_falls_through() {
    let host = MemoryHost::new();
    host.seed_stored(THEME_STORAGE_KEY, "neon");
    host.seed_root_attribute(THEME_ATTRIBUTE, "dark");

    let ctx = context_over(&host);
    let resolution = ctx.resolve_boot_theme();

    assert_eq!(resolution.theme, ThemeMode::Dark);
    assert_eq!(resolution.persisted, None);
    assert_eq!(host.stored(THEME_STORAGE_KEY), None);
}

#[test]
fn clear_preference_resumes_os_tracking_on_the_next_signal() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    ctx.set_theme(ThemeMode::Dark);
    host.set_media(MediaQuery::PrefersLight, true);
    assert_eq!(ctx.current_theme(), ThemeMode::Dark); // pinned

    ctx.clear_preference();
    assert_eq!(host.stored(THEME_STORAGE_KEY), None);
    // Unpinning alone does not recompute.
    assert_eq!(ctx.current_theme(), ThemeMode::Dark);

    host.set_media(MediaQuery::ForcedColors, true);
    assert_eq!(ctx.current_theme(), ThemeMode::Contrast);
}

#[test]
fn deferred_persistence_is_flushed_by_initialize() {
    let host = MemoryHost::new().without_storage();
    let ctx = context_over(&host);

    ctx.set_theme(ThemeMode::Dark);
    assert_eq!(host.stored(THEME_STORAGE_KEY), None);

    host.enable_storage();
    ctx.initialize();
    assert_eq!(host.stored(THEME_STORAGE_KEY), Some("dark".to_string()));
}

#[test]
fn a_panicking_listener_does_not_block_the_others() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    let _bad = ctx.subscribe(|_| panic!("listener defect"));
    let notifications = Arc::new(AtomicUsize::new(0));
    let _good = ctx.subscribe(counting_listener(&notifications));

    ctx.set_theme(ThemeMode::Contrast);
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.current_theme(), ThemeMode::Contrast);
}

#[test]
fn unsubscribed_listeners_stop_receiving_changes() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let sub_first = ctx.subscribe(counting_listener(&first));
    let _sub_second = ctx.subscribe(counting_listener(&second));
    assert_eq!(ctx.listener_count(), 2);

    ctx.set_theme(ThemeMode::Dark);
    sub_first.unsubscribe();
    assert_eq!(ctx.listener_count(), 1);
    ctx.set_theme(ThemeMode::Contrast);

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[test]
fn shutdown_detaches_os_watchers_and_is_idempotent() {
    let host = MemoryHost::new();
    let ctx = context_over(&host);
    ctx.initialize();
    assert_eq!(host.media_watcher_count(), 3);

    ctx.shutdown();
    assert_eq!(host.media_watcher_count(), 0);
    ctx.shutdown();

    // Detached watchers mean OS changes no longer reach the context.
    host.set_media(MediaQuery::PrefersDark, true);
    assert_eq!(ctx.current_theme(), ThemeMode::Light);
}

#[test]
fn dropping_the_last_handle_detaches_os_watchers() {
    let host = MemoryHost::new();
    {
        let ctx = context_over(&host);
        ctx.initialize();
        assert_eq!(host.media_watcher_count(), 3);
    }
    assert_eq!(host.media_watcher_count(), 0);
}

#[test]
fn token_surface_maps_dotted_paths_to_custom_properties() {
    let host = MemoryHost::new();
    host.seed_computed("--color-text-primary", " #1a1a2e ");

    let ctx = context_over(&host);
    assert_eq!(
        ctx.token_value("color.text.primary"),
        Some("#1a1a2e".to_string())
    );
    assert_eq!(ctx.token_value("color.text.missing"), None);

    ctx.update_tokens([
        ("color.accent", "#0067c0"),
        ("motion.duration.fast", "120ms"),
    ]);
    assert_eq!(host.root_property("--color-accent"), Some("#0067c0".to_string()));
    assert_eq!(
        ctx.token_value("motion.duration.fast"),
        Some("120ms".to_string())
    );
}

#[test]
fn responsive_tokens_resolve_their_base_path() {
    let host = MemoryHost::new();
    host.seed_computed("--type-body-size", "14px");

    let ctx = context_over(&host);
    let mut paths = winden_theme::ResponsiveTokenPaths::base("type.body.size");
    paths.lg = Some("type.body-large.size".to_string());

    assert_eq!(ctx.responsive_token_value(&paths), Some("14px".to_string()));
}
