use leptos::prelude::*;

/// Shown for any path without a route.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<a href="/">"Back to jobs"</a>
		</div>
	}
}
