use yew::prelude::*;

use crate::theme::Theme;

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub on_theme: Callback<Option<Theme>>,
}

#[function_component(SettingsView)]
pub(crate) fn settings_view(props: &SettingsProps) -> Html {
    let theme_link = |label: &'static str, theme: Option<Theme>| {
        let on_theme = props.on_theme.clone();
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_theme.emit(theme);
        });
        html! {
            <li><a href="#" {onclick}>{label}</a></li>
        }
    };

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Settings"}</h2>
                <ul>
                    { theme_link("Auto", None) }
                    { theme_link("Light", Some(Theme::Light)) }
                    { theme_link("Dark", Some(Theme::Dark)) }
                </ul>
            </article>
        </dialog>
    }
}
