//! Request and response bodies of the JSON API.
//!
//! Field names follow the browser UI, which speaks Spanish.

use serde::{Deserialize, Serialize};

use salreg::metrics::Metrics;
use salreg_linear::{Description, ModelSummary, Params};

#[derive(Debug, Serialize)]
pub struct DataResponse {
    #[serde(rename = "X_train")]
    pub x_train: Vec<f64>,
    pub y_train: Vec<f64>,
    #[serde(rename = "X_test")]
    pub x_test: Vec<f64>,
    pub y_test: Vec<f64>,
    #[serde(rename = "X_all")]
    pub x_all: Vec<f64>,
    pub y_all: Vec<f64>,
}

impl From<Description<'_>> for DataResponse {
    fn from(description: Description<'_>) -> Self {
        DataResponse {
            x_train: description.train.x().to_vec(),
            y_train: description.train.y().to_vec(),
            x_test: description.test.x().to_vec(),
            y_test: description.test.y().to_vec(),
            x_all: description.all_x.to_vec(),
            y_all: description.all_y.to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub intercepto: f64,
    pub coeficiente: f64,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2_score: f64,
    pub max_error: f64,
    pub total_muestras: usize,
    pub muestras_entrenamiento: usize,
    pub muestras_prueba: usize,
}

impl MetricsResponse {
    pub fn new(params: Params, metrics: &Metrics, summary: &ModelSummary) -> MetricsResponse {
        MetricsResponse {
            intercepto: params.intercept,
            coeficiente: params.coefficient,
            mae: metrics.mae,
            mse: metrics.mse,
            rmse: metrics.rmse,
            r2_score: metrics.r2,
            max_error: metrics.max_error,
            total_muestras: summary.n_total,
            muestras_entrenamiento: summary.n_train,
            muestras_prueba: summary.n_test,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub anos_experiencia: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub exito: bool,
    pub anos_experiencia: f64,
    pub salario_predicho: f64,
    pub salario_formateado: String,
    pub ecuacion: String,
}

impl PredictResponse {
    pub fn new(years: f64, salary: f64, equation: String) -> PredictResponse {
        PredictResponse {
            exito: true,
            anos_experiencia: years,
            salario_predicho: round2(salary),
            salario_formateado: format_currency(salary),
            ecuacion: equation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_range_max")]
    pub max: f64,
    #[serde(default = "default_range_points")]
    pub puntos: usize,
}

fn default_range_max() -> f64 {
    20.0
}

fn default_range_points() -> usize {
    50
}

impl Default for RangeRequest {
    fn default() -> Self {
        RangeRequest {
            min: 0.0,
            max: default_range_max(),
            puntos: default_range_points(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    pub exito: bool,
    pub anos: Vec<f64>,
    pub salarios: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub disponible: bool,
    pub tipo: &'static str,
    pub variable_independiente: &'static str,
    pub variable_dependiente: &'static str,
    pub coeficiente: f64,
    pub intercepto: f64,
    pub r2_score: f64,
    pub muestras_totales: usize,
    pub muestras_entrenamiento: usize,
    pub muestras_prueba: usize,
}

impl From<&ModelSummary> for ModelInfoResponse {
    fn from(summary: &ModelSummary) -> Self {
        ModelInfoResponse {
            disponible: true,
            tipo: summary.kind,
            variable_independiente: summary.feature,
            variable_dependiente: summary.target,
            coeficiente: summary.params.coefficient,
            intercepto: summary.params.intercept,
            r2_score: summary.r2,
            muestras_totales: summary.n_total,
            muestras_entrenamiento: summary.n_train,
            muestras_prueba: summary.n_test,
        }
    }
}

/// Body of every unsuccessful answer.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub exito: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl Failure {
    pub fn new<S: Into<String>>(error: S) -> Failure {
        Failure {
            exito: false,
            error: error.into(),
            mensaje: None,
        }
    }

    pub fn with_message<S: Into<String>>(mut self, mensaje: S) -> Failure {
        self.mensaje = Some(mensaje.into());
        self
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Dollar amount with two decimals and thousands separators, `$84,041.25`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_at(fixed.len() - 3);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_currency_works() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(84041.2468), "$84,041.25");
        assert_eq!(format_currency(123456.0), "$123,456.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-2500.5), "-$2,500.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn round2_works() {
        assert_eq!(round2(84041.2468), 84041.25);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn range_request_defaults() {
        let request: RangeRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(request.min, 0.0);
        assert_eq!(request.max, 20.0);
        assert_eq!(request.puntos, 50);
    }

    #[test]
    fn predict_request_needs_a_number() {
        assert!(serde_json::from_str::<PredictRequest>(r#"{"anos_experiencia": 4.5}"#).is_ok());
        assert!(serde_json::from_str::<PredictRequest>(r#"{"anos_experiencia": "cinco"}"#).is_err());
        assert!(serde_json::from_str::<PredictRequest>("{}").is_err());
    }

    #[test]
    fn data_response_uses_ui_field_names() {
        let response = DataResponse {
            x_train: vec![1.0],
            y_train: vec![2.0],
            x_test: vec![3.0],
            y_test: vec![4.0],
            x_all: vec![1.0, 3.0],
            y_all: vec![2.0, 4.0],
        };
        let value = serde_json::to_value(&response).unwrap();

        for key in &["X_train", "y_train", "X_test", "y_test", "X_all", "y_all"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn failure_skips_empty_message() {
        let value = serde_json::to_value(&Failure::new("boom")).unwrap();
        assert_eq!(value, serde_json::json!({ "exito": false, "error": "boom" }));

        let value = serde_json::to_value(&Failure::new("boom").with_message("details")).unwrap();
        assert_eq!(value["mensaje"], "details");
    }
}
