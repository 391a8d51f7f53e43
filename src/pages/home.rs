use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen_futures::spawn_local;

use crate::api::{fetch_graph, fetch_recorder_state};
use crate::components::action_graph::ActionGraphCanvas;
use crate::components::node_panel::NodePanel;
use crate::config::{LayoutConfig, POLL_INTERVAL_MS, TOP_K_MAX, TOP_K_MIN, ViewSettings};
use crate::events::{StreamMessage, connect_event_stream};
use crate::store::GraphStore;

/// Polls the graph until `alive` is cleared. Every tick spawns its own fetch
/// so a slow response never delays the next tick; the store's sequence
/// numbers sort out responses that arrive late.
fn start_polling(store: RwSignal<GraphStore>, alive: Arc<AtomicBool>) {
	spawn_local(async move {
		while alive.load(Ordering::Relaxed) {
			let Some(seq) = store.try_update_untracked(GraphStore::begin_fetch) else {
				break;
			};
			let alive_fetch = alive.clone();
			spawn_local(async move {
				match fetch_graph().await {
					Ok(snapshot) if alive_fetch.load(Ordering::Relaxed) => {
						store.try_update(|s| s.apply_snapshot(seq, snapshot));
					}
					Ok(_) => {}
					Err(e) => debug!("graph fetch #{seq} failed: {e}"),
				}
			});
			TimeoutFuture::new(POLL_INTERVAL_MS).await;
		}
		debug!("graph polling stopped");
	});
}

fn load_recorder_state(store: RwSignal<GraphStore>) {
	spawn_local(async move {
		match fetch_recorder_state().await {
			Ok(state) => {
				store.try_update(|s| s.apply_recorder_state(state));
			}
			Err(e) => debug!("recorder state unavailable: {e}"),
		}
	});
}

/// Checkbox bound to one boolean of the view settings.
fn setting_toggle(
	store: RwSignal<GraphStore>,
	label: &'static str,
	get: fn(&ViewSettings) -> bool,
	set: fn(&mut ViewSettings, bool),
) -> impl IntoView {
	view! {
		<label class="toggle">
			<input
				type="checkbox"
				prop:checked=move || store.with(|s| get(&s.settings))
				on:change=move |ev| {
					let checked = event_target_checked(&ev);
					store.update(|s| set(&mut s.settings, checked));
				}
			/>
			{label}
		</label>
	}
}

/// Live action graph page
#[component]
pub fn Home() -> impl IntoView {
	let store = RwSignal::new(GraphStore::default());
	let config = LayoutConfig::default();
	let layout = Memo::new({
		let config = config.clone();
		move |_| store.with(|s| s.layout(&config))
	});

	let alive = Arc::new(AtomicBool::new(true));
	start_polling(store, alive.clone());
	load_recorder_state(store);

	let socket = StoredValue::new_local(connect_event_stream(move |message| {
		// Raw events are not drawn; only hello and action frames touch the store.
		match message {
			StreamMessage::Event { event } => {
				log::trace!("recorder event {}", event.get("type").unwrap_or(&event));
			}
			StreamMessage::Unknown => {}
			message => {
				store.try_update(|s| s.apply_stream(message));
			}
		}
	}));

	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		socket.try_with_value(|ws| {
			if let Some(ws) = ws {
				let _ = ws.close();
			}
		});
	});

	let recording = move || store.with(|s| s.recording);
	let counts = move || {
		layout.with(|l| format!("{} nodes · {} edges · {} levels", l.nodes.len(), l.edges.len(), l.levels))
	};
	let age = move || {
		store.with(|s| {
			s.snapshot.as_ref().and_then(|snap| {
				(snap.generated_at > 0).then(|| {
					let secs = (js_sys::Date::now() - snap.generated_at as f64).max(0.0) / 1000.0;
					format!("updated {secs:.0}s ago")
				})
			})
		})
	};
	let top_k = move || store.with(|s| s.settings.top_k);
	let hosts = move || store.with(|s| s.allowed_hosts.join(", "));
	let last_action = move || {
		store.with(|s| {
			s.actions
				.latest()
				.map(|a| format!("last: {}", a.label.lines().next().unwrap_or(&a.id)))
		})
	};
	let collisions = move || {
		layout.with(|l| {
			(!l.anomalies.is_empty()).then(|| format!("{} id collisions", l.anomalies.len()))
		})
	};

	view! {
		<div class="fullscreen-graph">
			<ActionGraphCanvas
				layout=layout
				config=config
				fullscreen=true
				on_hover={move |raw: Option<String>| store.update(|s| s.set_hover(raw))}
				on_select={move |raw: String| store.update(|s| s.toggle_focus(&raw))}
			/>
			<div class="graph-overlay">
				<header>
					<h1>"Action Graph"</h1>
					<span class="badge" class:recording=recording title=hosts>
						{move || if recording() { "recording" } else { "idle" }}
					</span>
					<p class="subtitle">{counts} " " {age} " " {collisions}</p>
					<p class="subtitle">{last_action}</p>
				</header>
				<div class="controls">
					{setting_toggle(store, "Hide DOM", |v| v.hide_dom, |v, on| v.hide_dom = on)}
					{setting_toggle(store, "Hide mouse", |v| v.hide_mouse, |v, on| v.hide_mouse = on)}
					{setting_toggle(
						store,
						"Hide keyboard",
						|v| v.hide_keyboard,
						|v, on| v.hide_keyboard = on,
					)}
					{setting_toggle(
						store,
						"Collapse tabs",
						|v| v.collapse_tabs,
						|v, on| v.collapse_tabs = on,
					)}
					<label class="slider">
						"Top edges "
						<input
							type="range"
							min={TOP_K_MIN.to_string()}
							max={TOP_K_MAX.to_string()}
							prop:value=move || top_k().to_string()
							on:input=move |ev| {
								if let Ok(k) = event_target_value(&ev).parse::<usize>() {
									store.update(|s| s.settings.set_top_k(k));
								}
							}
						/>
						{top_k}
					</label>
				</div>
			</div>
			<NodePanel
				layout=layout
				focus={Signal::derive(move || store.with(|s| s.focus.clone()))}
				on_clear={move |_| store.update(GraphStore::clear_focus)}
			/>
		</div>
	}
}
