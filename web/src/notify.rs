use yew::prelude::*;

/// How long a notice stays on screen before dismissing itself.
pub(crate) const NOTICE_MILLIS: u32 = 3_000;

#[derive(Properties, PartialEq)]
pub(crate) struct NoticeProps {
    pub message: AttrValue,
    pub on_dismiss: Callback<()>,
}

/// Toast surfacing a rejected move; clicking it dismisses early.
#[function_component(NoticeView)]
pub(crate) fn notice_view(props: &NoticeProps) -> Html {
    let message = props.message.clone();
    let on_dismiss = props.on_dismiss.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_dismiss.emit(()));

    html! {
        <aside class="notice" role="alert" {onclick}>{message}</aside>
    }
}
