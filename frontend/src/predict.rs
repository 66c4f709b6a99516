use dioxus::prelude::*;
use dioxus_markdown::Markdown;
use gloo_timers::future::TimeoutFuture;
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

use stellest_common::prediction::ModelInfo;

use crate::errors::PredictionError;
use crate::form;
use crate::model_registry::{MEMBER_MODELS, fallback_model_info, get_member_model};
use crate::render::{self, ResultView, RiskPanelView};
use crate::server_api::ApiClient;
use crate::validate;

/// 予測ビューのメインコンポーネント
///
/// 収集 → 検証 → 送信 → 描画のパイプラインはすべてここから起動する。
#[component]
pub fn view(client: Signal<Arc<ApiClient>>) -> Element {
    // 入力フィールド（認識対象の13項目）
    let mut patient_name = use_signal(String::new);
    let mut age = use_signal(String::new);
    let mut age_myopia_diagnosis = use_signal(String::new);
    let mut gender = use_signal(String::new);
    let mut family_history_myopia = use_signal(String::new);
    let mut outdoor_time = use_signal(String::new);
    let mut screen_time = use_signal(String::new);
    let mut previous_myopia_control = use_signal(String::new);
    let mut initial_power_re = use_signal(String::new);
    let mut initial_power_le = use_signal(String::new);
    let mut initial_axial_length_re = use_signal(String::new);
    let mut initial_axial_length_le = use_signal(String::new);
    let mut stellest_wearing_time = use_signal(String::new);

    let mut loading = use_signal(|| false);
    let mut error_message = use_signal(|| None::<PredictionError>);
    let mut error_seq = use_signal(|| 0u32);
    let mut result_view = use_signal(|| None::<ResultView>);
    let mut model_info = use_signal(|| None::<ModelInfo>);

    // モデル情報はベストエフォートで取得し、失敗したら固定の説明に落とす
    use_effect(move || {
        let api = client();
        spawn_local(async move {
            let info = match api.model.model_info().await {
                Ok(info) => info,
                Err(e) => {
                    web_sys::console::warn_1(&format!("model_info fetch failed: {e}").into());
                    fallback_model_info()
                }
            };
            model_info.set(Some(info));
        });
    });

    // エラーは1件だけ表示し、5秒後に自動で消す。
    // 後続のエラーが表示されていたら古いタイマーでは消さない。
    let mut show_error = move |error: PredictionError| {
        web_sys::console::error_1(&error.detail().into());
        error_message.set(Some(error));
        let seq = error_seq() + 1;
        error_seq.set(seq);
        spawn_local(async move {
            TimeoutFuture::new(5_000).await;
            if error_seq() == seq {
                error_message.set(None);
            }
        });
    };

    let on_submit = move |_| {
        // 送信中の再送信は受け付けない（キューにも入れない）
        if loading() {
            return;
        }
        loading.set(true);
        error_message.set(None);
        result_view.set(None);

        let raw: Vec<(&'static str, String)> = vec![
            ("patient_name", patient_name()),
            ("age", age()),
            ("age_myopia_diagnosis", age_myopia_diagnosis()),
            ("gender", gender()),
            ("family_history_myopia", family_history_myopia()),
            ("outdoor_time", outdoor_time()),
            ("screen_time", screen_time()),
            ("previous_myopia_control", previous_myopia_control()),
            ("initial_power_re", initial_power_re()),
            ("initial_power_le", initial_power_le()),
            ("initial_axial_length_re", initial_axial_length_re()),
            ("initial_axial_length_le", initial_axial_length_le()),
            ("stellest_wearing_time", stellest_wearing_time()),
        ];
        let api = client();
        spawn_local(async move {
            match run_prediction(&api, &raw).await {
                Ok(view) => {
                    result_view.set(Some(view));
                    scroll_results_into_view();
                }
                Err(error) => show_error(error),
            }
            // 成否にかかわらず必ずローディング状態を解除する
            loading.set(false);
        });
    };

    rsx! {
        div { class: "predict-view",
            h2 { "Stellest Lens Benefit Prediction" }

            // モデル情報ヘッダー
            if let Some(info) = model_info() {
                div { class: "model-info",
                    style: "margin-bottom: 15px; padding: 10px; background-color: #f8f9fa; border-radius: 4px;",
                    p { style: "margin: 0; font-size: 14px;",
                        strong { "{info.model_name}" }
                        ": {info.description}"
                    }
                    p { style: "margin: 4px 0 0 0; font-size: 12px; color: #666;",
                        "Accuracy: {info.accuracy}, features: {info.features_count}, training samples: {info.training_samples}, updated: {info.last_updated}"
                    }
                }
            }

            div { class: "patient-form",
                div { class: "form-row",
                    style: "display: flex; gap: 10px; margin-bottom: 10px;",
                    div { style: "flex: 2;",
                        label { class: "form-label", "Patient Name:" }
                        input {
                            class: "form-control",
                            value: "{patient_name}",
                            oninput: move |e| patient_name.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Age (years):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "4", max: "25", step: "0.5",
                            value: "{age}",
                            oninput: move |e| age.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Age at Myopia Diagnosis:" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "2", max: "20", step: "0.5",
                            value: "{age_myopia_diagnosis}",
                            oninput: move |e| age_myopia_diagnosis.set(e.value()),
                        }
                    }
                }

                div { class: "form-row",
                    style: "display: flex; gap: 10px; margin-bottom: 10px;",
                    div { style: "flex: 1;",
                        label { class: "form-label", "Gender:" }
                        select {
                            class: "form-select",
                            value: "{gender}",
                            onchange: move |e| gender.set(e.value()),
                            option { value: "", "Select..." }
                            option { value: "1", "Male" }
                            option { value: "2", "Female" }
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Family History of Myopia:" }
                        select {
                            class: "form-select",
                            value: "{family_history_myopia}",
                            onchange: move |e| family_history_myopia.set(e.value()),
                            option { value: "", "Select..." }
                            option { value: "0", "No" }
                            option { value: "1", "Yes" }
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Previous Myopia Control:" }
                        select {
                            class: "form-select",
                            value: "{previous_myopia_control}",
                            onchange: move |e| previous_myopia_control.set(e.value()),
                            option { value: "", "Select..." }
                            option { value: "0", "No" }
                            option { value: "1", "Yes" }
                        }
                    }
                }

                div { class: "form-row",
                    style: "display: flex; gap: 10px; margin-bottom: 10px;",
                    div { style: "flex: 1;",
                        label { class: "form-label", "Outdoor Time (hours/day):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "0", max: "12", step: "0.5",
                            value: "{outdoor_time}",
                            oninput: move |e| outdoor_time.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Screen Time (hours/day):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "0", max: "16", step: "0.5",
                            value: "{screen_time}",
                            oninput: move |e| screen_time.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Stellest Wearing Time (hours/day):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "8", max: "18", step: "0.5",
                            value: "{stellest_wearing_time}",
                            oninput: move |e| stellest_wearing_time.set(e.value()),
                        }
                    }
                }

                div { class: "form-row",
                    style: "display: flex; gap: 10px; margin-bottom: 10px;",
                    div { style: "flex: 1;",
                        label { class: "form-label", "Initial Power RE (D):" }
                        input {
                            class: "form-control",
                            r#type: "number", max: "0", step: "0.25",
                            value: "{initial_power_re}",
                            oninput: move |e| initial_power_re.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Initial Power LE (D):" }
                        input {
                            class: "form-control",
                            r#type: "number", max: "0", step: "0.25",
                            value: "{initial_power_le}",
                            oninput: move |e| initial_power_le.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Axial Length RE (mm):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "20", max: "30", step: "0.1",
                            value: "{initial_axial_length_re}",
                            oninput: move |e| initial_axial_length_re.set(e.value()),
                        }
                    }
                    div { style: "flex: 1;",
                        label { class: "form-label", "Axial Length LE (mm):" }
                        input {
                            class: "form-control",
                            r#type: "number", min: "20", max: "30", step: "0.1",
                            value: "{initial_axial_length_le}",
                            oninput: move |e| initial_axial_length_le.set(e.value()),
                        }
                    }
                }

                button {
                    class: "btn btn-primary",
                    disabled: "{loading}",
                    onclick: on_submit,
                    if loading() { "Predicting..." } else { "Predict Treatment Benefit" }
                }
            }

            // エラートースト（一度に1件、5秒で自動消滅）
            if let Some(error) = error_message() {
                div {
                    class: "alert alert-danger",
                    style: "margin-top: 10px;",
                    "{error}"
                }
            }

            if let Some(view) = result_view() {
                results_section { view: view }
            }
        }
    }
}

/// 収集 → 検証 → 送信 → ビュー構築のパイプライン
///
/// 検証エラーはネットワークに到達する前に返る。通信・HTTPエラーは
/// すべて1種類のRequestFailedへ畳み込む。
async fn run_prediction(
    api: &ApiClient,
    raw: &[(&'static str, String)],
) -> Result<ResultView, PredictionError> {
    let draft = form::collect(raw);
    let patient = validate::validate(&draft)?;
    let result = api
        .predict
        .predict(&patient)
        .await
        .map_err(|e| PredictionError::RequestFailed(e.to_string()))?;
    Ok(render::build_result_view(&result))
}

/// 結果領域を画面内へスクロールする（UX上の補助、失敗しても無視）
fn scroll_results_into_view() {
    if let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("prediction-results"))
    {
        element.scroll_into_view();
    }
}

/// 予測結果の表示アダプタ
///
/// `ResultView`をそのまま描画するだけで、ここに表示ロジックは持たない。
#[component]
fn results_section(view: ResultView) -> Element {
    rsx! {
        div { id: "prediction-results", class: "results-container",
            style: "margin-top: 20px;",

            // 主要判定ブロック
            div {
                class: "verdict {view.verdict.style.css_class()}",
                style: "padding: 15px; border: 1px solid #ddd; border-radius: 5px;",
                h3 { "Prediction for {view.verdict.patient_name}" }
                p { class: "probability",
                    style: "font-size: 28px; margin: 5px 0;",
                    "{view.verdict.probability}"
                }
                p {
                    span { class: "benefit-glyph", style: "margin-right: 6px;", "{view.verdict.benefit_glyph}" }
                    span { class: "confidence-badge", "{view.verdict.confidence_label} Confidence" }
                }
                if !view.verdict.recommendation.is_empty() {
                    p { class: "recommendation", "{view.verdict.recommendation}" }
                }
                p { style: "font-size: 12px; color: #666;",
                    "Processing time: {view.verdict.processing_time}s"
                }
            }

            // 個別モデルテーブル
            if !view.models.is_empty() {
                div { class: "models-container",
                    style: "margin-top: 15px;",
                    h4 { "Individual Models" }
                    table { class: "table",
                        thead {
                            tr {
                                th { "Model" }
                                th { "Probability" }
                                th { "Confidence" }
                            }
                        }
                        tbody {
                            for row in view.models.iter() {
                                tr {
                                    td {
                                        "{row.name}"
                                        if let Some(member) = get_member_model(&row.id) {
                                            p { style: "margin: 0; font-size: 11px; color: #888;",
                                                "{member.description}"
                                            }
                                        }
                                    }
                                    td { "{row.probability}" }
                                    td { class: "{row.style.css_class()}", "{row.confidence_label}" }
                                }
                            }
                        }
                    }
                }
            }

            // リスク要因パネル
            if let Some(panel) = view.risk_panel.as_ref() {
                div { class: "risk-container",
                    style: "margin-top: 15px;",
                    h4 { "Risk Factors" }
                    {risk_panel_body(panel)}
                }
            }

            // 補足分析パネル
            if let Some(analytics) = view.analytics.as_ref() {
                div { class: "analytics-container",
                    style: "margin-top: 15px;",
                    h4 { "Enhanced Analytics" }

                    if !analytics.comparisons.is_empty() {
                        table { class: "table",
                            thead {
                                tr {
                                    th { "Metric" }
                                    th { "Value" }
                                    th { "Interpretation" }
                                }
                            }
                            tbody {
                                for row in analytics.comparisons.iter() {
                                    tr {
                                        td { "{row.label}" }
                                        td { "{row.value}" }
                                        td { "{row.interpretation}" }
                                    }
                                }
                            }
                        }
                    }

                    if let Some(profile) = analytics.risk_profile.as_ref() {
                        div { class: "risk-profile",
                            style: "margin-top: 10px; padding: 10px; border-left: 4px solid {profile.color};",
                            p {
                                strong { "Risk Profile: " }
                                span { style: "color: {profile.color};", "{profile.category}" }
                                " (score {profile.score})"
                            }
                            if !profile.risk_factors.is_empty() {
                                ul { class: "risk-list",
                                    for factor in profile.risk_factors.iter() {
                                        li { class: "text-danger", "{factor}" }
                                    }
                                }
                            }
                            if !profile.protective_factors.is_empty() {
                                ul { class: "protective-list",
                                    for factor in profile.protective_factors.iter() {
                                        li { class: "text-success", "{factor}" }
                                    }
                                }
                            }
                        }
                    }

                    if !analytics.insights.is_empty() {
                        div { class: "insights",
                            style: "margin-top: 10px;",
                            h5 { "Clinical Insights" }
                            ul {
                                for insight in analytics.insights.iter() {
                                    li { "{insight}" }
                                }
                            }
                        }
                    }
                }
            }

            // ナラティブパネル
            if let Some(narrative) = view.narrative.as_ref() {
                div { class: "narrative-container",
                    style: "margin-top: 15px;",
                    h4 { "Clinical Analysis" }
                    if let Some(text) = narrative.clinical_narrative.as_ref() {
                        Markdown { src: "{text}" }
                    }
                    if let Some(text) = narrative.treatment_plan.as_ref() {
                        Markdown { src: "{text}" }
                    }
                }
            }

            // アンサンブル構成の説明
            div { class: "ensemble-members",
                style: "margin-top: 15px; font-size: 12px; color: #666;",
                h5 { "About the Ensemble" }
                ul {
                    for member in MEMBER_MODELS.iter() {
                        li {
                            strong { "{member.name}" }
                            ": {member.description}"
                        }
                    }
                }
            }
        }
    }
}

/// リスク要因パネルの本体（形に応じて2系統を描き分ける）
fn risk_panel_body(panel: &RiskPanelView) -> Element {
    match panel {
        RiskPanelView::Categorized {
            high_risk,
            medium_risk,
            protective,
        } => rsx! {
            if !high_risk.is_empty() {
                div { class: "risk-group",
                    h5 { class: "text-danger", "High Risk" }
                    ul {
                        for factor in high_risk.iter() {
                            li { class: "text-danger", "{factor}" }
                        }
                    }
                }
            }
            if !medium_risk.is_empty() {
                div { class: "risk-group",
                    h5 { class: "text-warning", "Medium Risk" }
                    ul {
                        for factor in medium_risk.iter() {
                            li { class: "text-warning", "{factor}" }
                        }
                    }
                }
            }
            if !protective.is_empty() {
                div { class: "risk-group",
                    h5 { class: "text-success", "Protective" }
                    ul {
                        for factor in protective.iter() {
                            li { class: "text-success", "{factor}" }
                        }
                    }
                }
            }
        },
        RiskPanelView::Impacts(rows) => rsx! {
            ul { class: "impact-list",
                for row in rows.iter() {
                    li {
                        class: if row.adverse { "text-danger" } else { "text-success" },
                        "{row.label}: {row.impact:+.3}"
                    }
                }
            }
        },
    }
}
