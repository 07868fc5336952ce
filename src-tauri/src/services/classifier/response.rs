use crate::error::AppError;
use crate::models::api_types::ClassificationResponse;
use crate::models::classify_types::{Classification, ClassificationResult, TopPrediction};

pub const MAX_TOP_PREDICTIONS: usize = 5;

/// Map the wire schema onto the internal result shape.
///
/// The server's top-5 order is trusted as confidence-descending; ranks follow
/// the received order.
pub fn map_response(response: ClassificationResponse) -> Result<Classification, AppError> {
    if !response.sucesso {
        return Err(AppError::Semantic(
            response
                .mensagem
                .unwrap_or_else(|| "sucesso = false".to_string()),
        ));
    }

    let planta = response.planta.ok_or_else(|| malformed("planta"))?;
    let diagnostico = response.diagnostico.ok_or_else(|| malformed("diagnostico"))?;
    let classe = response
        .classe_completa
        .ok_or_else(|| malformed("classe_completa"))?;

    let (disease, disease_pt) = if diagnostico.saudavel {
        (None, None)
    } else {
        (diagnostico.doenca, diagnostico.doenca_pt)
    };

    let result = ClassificationResult {
        class_name: classe.traduzida,
        confidence: diagnostico.confianca,
        is_healthy: diagnostico.saudavel,
        plant_name: planta.nome,
        plant_name_pt: planta.nome_pt,
        disease,
        disease_pt,
        message: response.mensagem.unwrap_or_default(),
    };

    let top_predictions = response
        .top_5
        .into_iter()
        .take(MAX_TOP_PREDICTIONS)
        .enumerate()
        .map(|(idx, pred)| TopPrediction {
            class_name: pred.classe_pt,
            confidence: pred.confianca,
            rank: idx as u32 + 1,
        })
        .collect();

    Ok(Classification {
        result,
        top_predictions,
    })
}

fn malformed(field: &str) -> AppError {
    AppError::Transport(format!("malformed response: missing '{}'", field))
}
