use stellest_common::patient::PatientInput;
use stellest_common::prediction::{EnsemblePrediction, NarrativeAnalysis};

/// 患者データと予測結果からナラティブ分析を生成する
///
/// テンプレートベースの決定的な文章生成。外部の生成AIは使わない。
pub fn analyze(patient: &PatientInput, ensemble: &EnsemblePrediction) -> NarrativeAnalysis {
    let probability = ensemble.probability;
    NarrativeAnalysis {
        clinical_narrative: Some(clinical_narrative(patient, probability)),
        treatment_plan: Some(treatment_plan(probability)),
        risk_assessment: Some(risk_assessment(patient, probability)),
        follow_up_schedule: Some(follow_up_schedule()),
        patient_education: Some(patient_education(probability)),
        alternative_treatments: Some(alternative_treatments()),
    }
}

/// 確率帯に応じた形容（高・中・低）
fn graded<'a>(probability: f64, high: &'a str, medium: &'a str, low: &'a str) -> &'a str {
    if probability > 0.7 {
        high
    } else if probability > 0.5 {
        medium
    } else {
        low
    }
}

fn clinical_narrative(patient: &PatientInput, probability: f64) -> String {
    format!(
        "{name} is a {age}-year-old patient presenting for myopia management evaluation. \
         Based on the comprehensive AI analysis, the patient shows {potential} potential \
         for Stellest lens treatment success. The ensemble model indicates a {pct:.1}% \
         probability of positive treatment outcomes, which is {tone} for clinical \
         decision-making.",
        name = patient.patient_name,
        age = patient.age,
        potential = graded(probability, "excellent", "moderate", "limited"),
        pct = probability * 100.0,
        tone = graded(probability, "highly encouraging", "promising", "concerning"),
    )
}

fn treatment_plan(probability: f64) -> String {
    format!(
        "**Primary Treatment Plan:**\n\
         1. Initiate Stellest lens therapy with {confidence} confidence\n\
         2. Schedule follow-up appointments every 6 months\n\
         3. Monitor axial length progression and refractive changes\n\
         4. Implement lifestyle modifications as needed\n\
         \n\
         **Expected Timeline:**\n\
         - Initial fitting and adaptation: 2-4 weeks\n\
         - First follow-up: 3 months\n\
         - Regular monitoring: Every 6 months\n\
         - Treatment duration: 2-3 years minimum",
        confidence = graded(probability, "high", "moderate", "cautious"),
    )
}

fn risk_assessment(patient: &PatientInput, probability: f64) -> String {
    format!(
        "**Risk Profile Analysis:**\n\
         - Treatment Success Probability: {pct:.1}%\n\
         - Risk Level: {level}\n\
         - Key Risk Factors: {risks}\n\
         - Protective Factors: {protective}",
        pct = probability * 100.0,
        level = graded(probability, "Low", "Medium", "High"),
        risks = key_risk_factors(patient),
        protective = key_protective_factors(patient),
    )
}

fn follow_up_schedule() -> String {
    "**Recommended Follow-up Schedule:**\n\
     1. **Week 1-2**: Initial fitting and comfort assessment\n\
     2. **Month 1**: Visual acuity and comfort evaluation\n\
     3. **Month 3**: Comprehensive examination with axial length measurement\n\
     4. **Month 6**: Full assessment including progression analysis\n\
     5. **Every 6 months**: Ongoing monitoring and treatment adjustment"
        .to_string()
}

fn patient_education(probability: f64) -> String {
    format!(
        "**Patient Education Points:**\n\
         1. **Treatment Goals**: Slow myopia progression and reduce risk of complications\n\
         2. **Expected Outcomes**: {outcome} reduction in myopia progression over 2-3 years\n\
         3. **Compliance Importance**: Consistent wear for optimal results\n\
         4. **Lifestyle Modifications**: Increase outdoor time, reduce screen time\n\
         5. **Long-term Benefits**: Reduced risk of high myopia complications",
        outcome = graded(probability, "Significant", "Moderate", "Limited"),
    )
}

fn alternative_treatments() -> String {
    "**Alternative Treatment Options:**\n\
     1. **Atropine Eye Drops**: Low-dose atropine (0.01-0.05%) for myopia control\n\
     2. **Orthokeratology**: Overnight contact lenses for temporary vision correction\n\
     3. **Multifocal Contact Lenses**: Soft contact lenses with myopia control features\n\
     4. **Lifestyle Interventions**: Increased outdoor time, reduced near work\n\
     5. **Combination Therapy**: Stellest lens with low-dose atropine"
        .to_string()
}

/// 主要なリスク要因を1行に要約する
fn key_risk_factors(patient: &PatientInput) -> String {
    let mut factors = Vec::new();
    if patient.age > 15.0 {
        factors.push("Advanced age");
    }
    if patient.screen_time > 6.0 {
        factors.push("High screen time");
    }
    if patient.outdoor_time < 1.0 {
        factors.push("Limited outdoor time");
    }
    if patient.family_history_myopia == 1 {
        factors.push("Family history");
    }
    if factors.is_empty() {
        "Minimal risk factors identified".to_string()
    } else {
        factors.join(", ")
    }
}

/// 主要な保護要因を1行に要約する
fn key_protective_factors(patient: &PatientInput) -> String {
    let mut factors = Vec::new();
    if patient.age < 12.0 {
        factors.push("Young age");
    }
    if patient.outdoor_time >= 2.0 {
        factors.push("Good outdoor time");
    }
    if patient.screen_time < 3.0 {
        factors.push("Limited screen time");
    }
    if patient.stellest_wearing_time >= 12.0 {
        factors.push("Good compliance potential");
    }
    if factors.is_empty() {
        "Standard risk profile".to_string()
    } else {
        factors.join(", ")
    }
}
