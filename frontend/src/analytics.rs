use dioxus::prelude::*;
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

use stellest_common::ApiResponse;
use stellest_common::analytics::DashboardData;

use crate::server_api::ApiClient;

/// 分析タブのビュー
///
/// ダッシュボードはタブを初めて開いたときに一度だけ読み込む。
/// シグナル自体はアプリルートが保持するので、タブを離れても消えない。
#[component]
pub fn view(client: Signal<Arc<ApiClient>>, dashboard: Signal<Option<DashboardData>>) -> Element {
    let mut load_error = use_signal(|| None::<String>);

    use_effect(move || {
        if dashboard.peek().is_some() {
            return;
        }
        let api = client();
        spawn_local(async move {
            match api.analytics.dashboard().await {
                Ok(ApiResponse::Success(data)) => dashboard.set(Some(data)),
                Ok(ApiResponse::Error(message)) => {
                    web_sys::console::error_1(&format!("dashboard error: {message}").into());
                    load_error.set(Some(message));
                }
                Err(e) => {
                    // ベストエフォート読み込み。失敗してもページは生かす
                    web_sys::console::error_1(&format!("dashboard fetch failed: {e}").into());
                    load_error.set(Some("Analytics are temporarily unavailable.".to_string()));
                }
            }
        });
    });

    rsx! {
        div { class: "analytics-view",
            h2 { "Population Analytics" }

            if let Some(message) = load_error() {
                div { class: "alert alert-warning", "{message}" }
            }

            if let Some(data) = dashboard() {
                div { class: "dashboard-cards",
                    style: "display: flex; gap: 15px; margin-bottom: 20px;",
                    div { class: "stat-card",
                        style: "flex: 1; padding: 15px; border: 1px solid #ddd; border-radius: 5px;",
                        p { style: "margin: 0; font-size: 24px; font-weight: bold;", "{data.total_patients}" }
                        p { style: "margin: 0; color: #666;", "Patients in reference cohort" }
                    }
                    div { class: "stat-card",
                        style: "flex: 1; padding: 15px; border: 1px solid #ddd; border-radius: 5px;",
                        p { style: "margin: 0; font-size: 24px; font-weight: bold;", "{percent(data.success_rate)}" }
                        p { style: "margin: 0; color: #666;", "Overall treatment success rate" }
                    }
                    div { class: "stat-card",
                        style: "flex: 1; padding: 15px; border: 1px solid #ddd; border-radius: 5px;",
                        p { style: "margin: 0; font-size: 24px; font-weight: bold;", "{data.average_age}" }
                        p { style: "margin: 0; color: #666;", "Average patient age (years)" }
                    }
                }

                div { class: "common-risks",
                    h4 { "Most Common Risk Factors" }
                    ul {
                        for factor in data.common_risk_factors.iter() {
                            li { "{factor}" }
                        }
                    }
                }

                div { class: "treatment-mix",
                    h4 { "Predicted Treatment Benefit Mix" }
                    table { class: "table",
                        thead {
                            tr {
                                th { "Outlook" }
                                th { "Share of patients" }
                            }
                        }
                        tbody {
                            tr {
                                td { "High success" }
                                td { "{percent(data.treatment_recommendations.high_success)}" }
                            }
                            tr {
                                td { "Medium success" }
                                td { "{percent(data.treatment_recommendations.medium_success)}" }
                            }
                            tr {
                                td { "Low success" }
                                td { "{percent(data.treatment_recommendations.low_success)}" }
                            }
                        }
                    }
                }
            } else if load_error().is_none() {
                p { "Loading analytics..." }
            }
        }
    }
}

/// 比率を整数パーセント表記へ
fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
