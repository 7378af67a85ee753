/// Popup UI: windows, tabs and groups of the browser, with grouping actions

use crate::config::PopupConfig;
use crate::error::TabError;
use crate::gateway::ChromeGateway;
use crate::groups::GroupService;
use crate::selection::SelectionSet;
use crate::tab_data::{GroupColor, GroupId, TabId, WindowId};
use crate::ui::components::{CreateGroupDialog, GroupList, WindowList};
use crate::view_model::{refresh_view, ViewModel};
use patternfly_yew::prelude::*;
use std::collections::BTreeSet;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

/// Status line plus the last successfully built model
#[derive(Clone, Debug, PartialEq)]
struct PopupView {
    state: AppState,
    model: Option<Rc<ViewModel>>,
}

impl Default for PopupView {
    fn default() -> Self {
        PopupView {
            state: AppState::Loading("Loading windows...".to_string()),
            model: None,
        }
    }
}

enum PopupAction {
    Loading(String),
    Rebuilt(ViewModel),
    Failed(String),
}

impl Reducible for PopupView {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: PopupAction) -> Rc<Self> {
        let (state, model) = match action {
            PopupAction::Loading(msg) => (AppState::Loading(msg), self.model.clone()),
            PopupAction::Rebuilt(model) => (AppState::Idle, Some(Rc::new(model))),
            // The last good model stays on screen
            PopupAction::Failed(msg) => (AppState::Error(msg), self.model.clone()),
        };
        Rc::new(PopupView { state, model })
    }
}

/// Alert text for a failed action; `None` when a repeated click was just ignored
fn failure_message(context: &str, error: &TabError) -> Option<String> {
    match error {
        TabError::Busy(_) => None,
        e => Some(format!("{}: {}", context, e)),
    }
}

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    #[prop_or_default]
    pub config: PopupConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    let view = use_reducer(PopupView::default);
    let selected = use_state(|| Rc::new(BTreeSet::<TabId>::new()));
    let dialog_open = use_state(|| false);
    let service = use_memo((), |_| GroupService::new(ChromeGateway));

    let selection = {
        let selected = selected.clone();
        use_mut_ref(move || {
            SelectionSet::with_observer(move |tabs| selected.set(Rc::new(tabs.clone())))
        })
    };

    // Full rebuild from the host, then drop selected tabs that are gone
    let refresh = {
        let dispatcher = view.dispatcher();
        let selection = selection.clone();
        let service = service.clone();

        Callback::from(move |_: ()| {
            let dispatcher = dispatcher.clone();
            let selection = selection.clone();
            let service = service.clone();

            spawn_local(async move {
                match refresh_view(service.gateway(), &selection).await {
                    Ok(model) => dispatcher.dispatch(PopupAction::Rebuilt(model)),
                    Err(e) => {
                        let msg = format!("Failed to load tabs: {}", e);
                        dispatcher.dispatch(PopupAction::Failed(msg));
                    }
                }
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let on_refresh = {
        let dispatcher = view.dispatcher();
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| {
            dispatcher.dispatch(PopupAction::Loading("Refreshing...".to_string()));
            refresh.emit(());
        })
    };

    let on_toggle_tab = {
        let selection = selection.clone();
        Callback::from(move |(tab_id, checked): (TabId, bool)| {
            selection.borrow_mut().toggle(tab_id, checked);
        })
    };

    let on_focus_tab = {
        let dispatcher = view.dispatcher();
        let service = service.clone();
        Callback::from(move |(window_id, tab_id): (WindowId, TabId)| {
            let dispatcher = dispatcher.clone();
            let service = service.clone();
            spawn_local(async move {
                if let Err(e) = service.focus_tab_in_window(window_id, tab_id).await {
                    if let Some(msg) = failure_message("Failed to focus tab", &e) {
                        dispatcher.dispatch(PopupAction::Failed(msg));
                    }
                }
            });
        })
    };

    let on_select_group = {
        let dispatcher = view.dispatcher();
        let model = view.model.clone();
        let service = service.clone();
        let refresh = refresh.clone();
        Callback::from(move |group_id: GroupId| {
            let Some(current) = model.clone() else {
                return;
            };
            let dispatcher = dispatcher.clone();
            let service = service.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match service.focus_group(&current, group_id).await {
                    Ok(()) => refresh.emit(()),
                    Err(e) => {
                        if let Some(msg) = failure_message("Failed to toggle group", &e) {
                            dispatcher.dispatch(PopupAction::Failed(msg));
                        }
                    }
                }
            });
        })
    };

    let on_open_dialog = {
        let dialog_open = dialog_open.clone();
        Callback::from(move |_: MouseEvent| dialog_open.set(true))
    };

    let on_cancel_dialog = {
        let dialog_open = dialog_open.clone();
        Callback::from(move |_: ()| dialog_open.set(false))
    };

    let on_confirm_group = {
        let dispatcher = view.dispatcher();
        let selection = selection.clone();
        let dialog_open = dialog_open.clone();
        let service = service.clone();
        let refresh = refresh.clone();
        Callback::from(move |(name, color): (String, GroupColor)| {
            let tab_ids = selection.borrow().snapshot();
            let dispatcher = dispatcher.clone();
            let selection = selection.clone();
            let dialog_open = dialog_open.clone();
            let service = service.clone();
            let refresh = refresh.clone();

            dispatcher.dispatch(PopupAction::Loading("Creating group...".to_string()));

            spawn_local(async move {
                match service.create_group(&tab_ids, &name, color).await {
                    Ok(_) => {
                        dialog_open.set(false);
                        selection.borrow_mut().clear();
                        refresh.emit(());
                    }
                    Err(e) => {
                        if let Some(msg) = failure_message("Failed to create group", &e) {
                            dispatcher.dispatch(PopupAction::Failed(msg));
                        }
                    }
                }
            });
        })
    };

    let is_busy = matches!(view.state, AppState::Loading(_));
    let show_create = config.shows_create_button(selected.len());

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Organizer"}</h1>

            <div class="controls">
                <Button onclick={on_refresh} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Refresh"}
                </Button>
                if show_create {
                    <Button
                        onclick={on_open_dialog}
                        disabled={is_busy}
                        variant={ButtonVariant::Primary}
                    >
                        {"Create Group"}
                    </Button>
                }
            </div>

            // Status display
            {match &view.state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            if let Some(current) = view.model.clone() {
                <GroupList model={current.clone()} on_select={on_select_group} />
                <WindowList
                    model={current}
                    selected={(*selected).clone()}
                    on_toggle={on_toggle_tab}
                    on_focus={on_focus_tab}
                />
            }

            if *dialog_open {
                <CreateGroupDialog
                    default_color={config.default_color}
                    busy={is_busy}
                    on_confirm={on_confirm_group}
                    on_cancel={on_cancel_dialog}
                />
            }
        </div>
    }
}
