use crate::components::Stage;
use crate::state::PlayerContext;
use dioxus::desktop::use_window;
use dioxus::prelude::*;
use tracing::info;
use ustplayer_core::Color;

/// Root application component.
/// Fills the window with the background color and closes on Escape.
#[component]
pub fn App() -> Element {
    let window = use_window();
    let player = use_context::<PlayerContext>();
    let background = player.settings.background_color;

    let on_key_down = move |evt: KeyboardEvent| {
        if evt.key() == Key::Escape {
            info!("Escape pressed, closing");
            player.handle.cancel();
            window.close();
        }
    };

    rsx! {
        div {
            class: "app",
            style: "{root_style(background)}",
            tabindex: 0,
            autofocus: true,
            onkeydown: on_key_down,

            Stage {}
        }
    }
}

fn root_style(background: Color) -> String {
    format!(
        "position: fixed; inset: 0; overflow: hidden; outline: none; cursor: none; \
        background-color: {};",
        background.to_hex()
    )
}
