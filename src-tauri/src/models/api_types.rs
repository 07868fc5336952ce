//! Wire schema of the remote classification endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ClassificationRequest<'a> {
    pub image: &'a str,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiPlant {
    pub nome: String,
    pub nome_pt: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiDiagnostic {
    pub saudavel: bool,
    #[serde(default)]
    pub doenca: Option<String>,
    #[serde(default)]
    pub doenca_pt: Option<String>,
    pub confianca: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiClassComplete {
    #[allow(dead_code)]
    pub original: String,
    pub traduzida: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiTopPrediction {
    #[allow(dead_code)]
    pub indice: i64,
    #[allow(dead_code)]
    pub classe: String,
    pub classe_pt: String,
    pub confianca: f64,
}

/// Everything except `sucesso` is optional so a failure body still parses.
#[derive(Debug, Deserialize, Clone)]
pub struct ClassificationResponse {
    pub sucesso: bool,
    #[serde(default)]
    pub planta: Option<ApiPlant>,
    #[serde(default)]
    pub diagnostico: Option<ApiDiagnostic>,
    #[serde(default)]
    pub classe_completa: Option<ApiClassComplete>,
    #[serde(default)]
    pub top_5: Vec<ApiTopPrediction>,
    #[serde(default)]
    pub mensagem: Option<String>,
}
