use dioxus::prelude::*;

mod analytics;
mod api_underlying;
mod errors;
mod form;
mod model_registry;
mod predict;
mod render;
mod server_api;
mod validate;

use server_api::ApiClient;
use stellest_common::analytics::DashboardData;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus_web::launch::launch_cfg(App, dioxus_web::Config::default());
}

/// 表示タブ
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
    Prediction,
    Analytics,
}

#[component]
fn App() -> Element {
    // APIクライアントは起動時に一度だけ構築し、各ビューへ明示的に渡す
    let client = use_signal(|| ApiClient::new_shared(server_api::server_base_url()));
    let mut tab = use_signal(|| Tab::Prediction);
    // 分析タブのダッシュボード（初回表示時に遅延読み込み、以後保持）
    let dashboard = use_signal(|| None::<DashboardData>);

    rsx! {
        div { class: "container",
            h1 { "Stellest Myopia Prediction Platform" }

            // タブ切り替えは表示だけの操作で、通信は発生しない
            div { class: "tab-bar",
                style: "display: flex; gap: 5px; margin-bottom: 20px;",
                button {
                    class: if tab() == Tab::Prediction { "tab-button active" } else { "tab-button" },
                    onclick: move |_| tab.set(Tab::Prediction),
                    "Prediction"
                }
                button {
                    class: if tab() == Tab::Analytics { "tab-button active" } else { "tab-button" },
                    onclick: move |_| tab.set(Tab::Analytics),
                    "Analytics"
                }
            }

            {match tab() {
                Tab::Prediction => rsx! {
                    predict::view { client: client }
                },
                Tab::Analytics => rsx! {
                    analytics::view { client: client, dashboard: dashboard }
                },
            }}
        }
    }
}
