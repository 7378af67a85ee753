/// Window, tab and group views plus the create-group dialog.
///
/// Every component is a pure projection of its props: the popup rebuilds the
/// model and hands it down again instead of patching rendered rows.

use crate::tab_data::{GroupColor, GroupId, GroupRef, TabId, TabRef, WindowId, WindowRef};
use crate::view_model::{window_label, ViewModel};
use patternfly_yew::prelude::*;
use std::collections::BTreeSet;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn group_item_class(group: &GroupRef) -> String {
    format!("group-item {}", group.color)
}

pub fn group_status_marker(group: &GroupRef) -> &'static str {
    if group.is_active { "●" } else { "○" }
}

pub fn color_option_class(color: GroupColor, selected: bool) -> String {
    if selected {
        format!("color-option {} selected", color)
    } else {
        format!("color-option {}", color)
    }
}

#[derive(Properties, PartialEq)]
pub struct TabRowProps {
    pub window_id: WindowId,
    pub tab: TabRef,
    pub selected: bool,
    pub on_toggle: Callback<(TabId, bool)>,
    pub on_focus: Callback<(WindowId, TabId)>,
}

#[function_component(TabRow)]
pub fn tab_row(props: &TabRowProps) -> Html {
    let tab_id = props.tab.id;
    let window_id = props.window_id;

    let onchange = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_toggle.emit((tab_id, input.checked()));
            }
        })
    };

    // Checkbox clicks select, they never focus
    let on_checkbox_click = Callback::from(|e: MouseEvent| e.stop_propagation());

    let onclick = {
        let on_focus = props.on_focus.clone();
        Callback::from(move |_: MouseEvent| on_focus.emit((window_id, tab_id)))
    };

    html! {
        <div class="tab-item" {onclick}>
            <input
                type="checkbox"
                class="tab-checkbox"
                checked={props.selected}
                {onchange}
                onclick={on_checkbox_click}
            />
            <img class="tab-favicon" src={props.tab.favicon_url.clone()} alt="" />
            <div class="tab-title">{&props.tab.title}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WindowBlockProps {
    pub index: usize,
    pub window: WindowRef,
    pub selected: Rc<BTreeSet<TabId>>,
    pub on_toggle: Callback<(TabId, bool)>,
    pub on_focus: Callback<(WindowId, TabId)>,
}

#[function_component(WindowBlock)]
pub fn window_block(props: &WindowBlockProps) -> Html {
    let window = &props.window;
    let class = classes!("window-container", window.is_current.then_some("current-window"));

    html! {
        <div {class}>
            <div class="window-header">{window_label(props.index, window.is_current)}</div>
            <div class="tab-list">
                {for window.tabs.iter().map(|tab| html! {
                    <TabRow
                        key={tab.id}
                        window_id={window.id}
                        tab={tab.clone()}
                        selected={props.selected.contains(&tab.id)}
                        on_toggle={props.on_toggle.clone()}
                        on_focus={props.on_focus.clone()}
                    />
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WindowListProps {
    pub model: Rc<ViewModel>,
    pub selected: Rc<BTreeSet<TabId>>,
    pub on_toggle: Callback<(TabId, bool)>,
    pub on_focus: Callback<(WindowId, TabId)>,
}

#[function_component(WindowList)]
pub fn window_list(props: &WindowListProps) -> Html {
    html! {
        <div class="windows-list">
            {for props.model.windows.iter().enumerate().map(|(index, window)| html! {
                <WindowBlock
                    key={window.id}
                    {index}
                    window={window.clone()}
                    selected={props.selected.clone()}
                    on_toggle={props.on_toggle.clone()}
                    on_focus={props.on_focus.clone()}
                />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct GroupListProps {
    pub model: Rc<ViewModel>,
    pub on_select: Callback<GroupId>,
}

/// Active groups; renders nothing at all when there are none
#[function_component(GroupList)]
pub fn group_list(props: &GroupListProps) -> Html {
    if props.model.groups.is_empty() {
        return html! {};
    }

    html! {
        <div class="groups-section">
            <h2 class="section-title">{"Groups"}</h2>
            <div class="group-list">
                {for props.model.groups.iter().map(|group| {
                    let group_id = group.id;
                    let onclick = {
                        let on_select = props.on_select.clone();
                        Callback::from(move |_: MouseEvent| on_select.emit(group_id))
                    };
                    html! {
                        <div key={group_id} class={group_item_class(group)} {onclick}>
                            <span class="group-status">{group_status_marker(group)}</span>
                            <span class="group-title">{group.display_title()}</span>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CreateGroupDialogProps {
    pub default_color: GroupColor,
    #[prop_or(false)]
    pub busy: bool,
    pub on_confirm: Callback<(String, GroupColor)>,
    pub on_cancel: Callback<()>,
}

#[function_component(CreateGroupDialog)]
pub fn create_group_dialog(props: &CreateGroupDialogProps) -> Html {
    let name = use_state(String::new);
    let color = {
        let default_color = props.default_color;
        use_state(move || default_color)
    };

    let on_name_input = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                name.set(input.value());
            }
        })
    };

    let on_confirm = {
        let name = name.clone();
        let color = color.clone();
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            on_confirm.emit(((*name).clone(), *color));
        })
    };

    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    html! {
        <div class="group-dialog">
            <div class="dialog-content">
                <input
                    type="text"
                    class="group-name-input"
                    placeholder="Name this group"
                    value={(*name).clone()}
                    oninput={on_name_input}
                />
                <div class="color-options">
                    {for GroupColor::ALL.into_iter().map(|option| {
                        let onclick = {
                            let color = color.clone();
                            Callback::from(move |_: MouseEvent| color.set(option))
                        };
                        html! {
                            <div
                                key={option.as_str()}
                                class={color_option_class(option, option == *color)}
                                data-color={option.as_str()}
                                {onclick}
                            />
                        }
                    })}
                </div>
                <div class="dialog-buttons">
                    <Button onclick={on_cancel} variant={ButtonVariant::Secondary}>
                        {"Cancel"}
                    </Button>
                    <Button
                        onclick={on_confirm}
                        disabled={props.busy}
                        variant={ButtonVariant::Primary}
                    >
                        {"Create"}
                    </Button>
                </div>
            </div>
        </div>
    }
}
