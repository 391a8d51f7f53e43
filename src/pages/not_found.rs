use leptos::prelude::*;

/// Fallback for unknown routes
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Nothing here"</h1>
			<p>"The action graph lives at "<a href="/">"/"</a>"."</p>
		</div>
	}
}
