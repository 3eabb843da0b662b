use log::warn;
use serde::de::DeserializeOwned;

use salreg::traits::Predict;
use salreg::Error;
use salreg_linear::RegressionEngine;

use crate::http::{Request, Response};
use crate::schema::{
    DataResponse, Failure, MetricsResponse, ModelInfoResponse, PredictRequest, PredictResponse,
    RangeRequest, RangeResponse,
};

const MAX_YEARS: f64 = 50.0;
const MAX_RANGE_POINTS: usize = 1000;

const KNOWN_PATHS: &[&str] = &[
    "/api/datos",
    "/api/metricas",
    "/api/predecir",
    "/api/predicciones_rango",
    "/api/info_modelo",
    "/favicon.ico",
];

/// Answer one request from the fitted engine.
pub fn handle(engine: &RegressionEngine, request: &Request) -> Response {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/datos") => Response::json(200, &DataResponse::from(engine.describe())),
        ("GET", "/api/metricas") => Response::json(
            200,
            &MetricsResponse::new(engine.params(), engine.metrics(), engine.summary()),
        ),
        ("POST", "/api/predecir") => predict(engine, &request.body),
        ("POST", "/api/predicciones_rango") => predict_range(engine, &request.body),
        ("GET", "/api/info_modelo") => {
            Response::json(200, &ModelInfoResponse::from(engine.summary()))
        }
        ("GET", "/favicon.ico") => Response::empty(204),
        (method, path) if KNOWN_PATHS.contains(&path) => {
            warn!("{method} not allowed on {path}");
            Response::json(
                405,
                &Failure::new("405 - Método no permitido")
                    .with_message(format!("La ruta {path} no acepta {method}.")),
            )
        }
        _ => Response::json(
            404,
            &Failure::new("404 - Página no encontrada")
                .with_message("La ruta solicitada no existe en el servidor."),
        ),
    }
}

/// Answer to a request that could not even be read.
pub fn bad_request(reason: &str) -> Response {
    Response::json(
        400,
        &Failure::new("Solicitud inválida.").with_message(reason.to_string()),
    )
}

fn predict(engine: &RegressionEngine, body: &[u8]) -> Response {
    let request = match parse_body::<PredictRequest>(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("rejected prediction request: {e}");
            return failure(&Error::InvalidInput(String::from(
                "Entrada inválida. Por favor ingresa un número válido.",
            )));
        }
    };

    let years = request.anos_experiencia;
    let answer = validate_years(years).and_then(|_| {
        let salary = engine.predict(years)?;
        Ok(PredictResponse::new(years, salary, engine.equation()?))
    });
    match answer {
        Ok(response) => Response::json(200, &response),
        Err(e) => failure(&e),
    }
}

fn predict_range(engine: &RegressionEngine, body: &[u8]) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RangeRequest::default()
    } else {
        match parse_body::<RangeRequest>(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("rejected range request: {e}");
                return failure(&Error::InvalidInput(String::from(
                    "Entrada inválida. Se esperaban 'min', 'max' y 'puntos' numéricos.",
                )));
            }
        }
    };
    if request.puntos > MAX_RANGE_POINTS {
        return failure(&Error::InvalidInput(format!(
            "Se admiten como máximo {MAX_RANGE_POINTS} puntos."
        )));
    }

    match engine.predict_range(request.min, request.max, request.puntos) {
        Ok((years, salaries)) => Response::json(
            200,
            &RangeResponse {
                exito: true,
                anos: years.to_vec(),
                salarios: salaries.to_vec(),
            },
        ),
        Err(e) => failure(&e),
    }
}

/// The 0-50 years window is a policy of this API, not of the model.
fn validate_years(years: f64) -> salreg::Result<()> {
    if !years.is_finite() {
        return Err(Error::InvalidInput(String::from(
            "Entrada inválida. Por favor ingresa un número válido.",
        )));
    }
    if years < 0.0 {
        return Err(Error::InvalidInput(String::from(
            "Los años de experiencia no pueden ser negativos.",
        )));
    }
    if years > MAX_YEARS {
        return Err(Error::InvalidInput(String::from(
            "Por favor ingresa un valor realista (0-50 años).",
        )));
    }
    Ok(())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(body)
}

fn failure(error: &Error) -> Response {
    match error {
        Error::InvalidInput(msg) => Response::json(400, &Failure::new(msg.as_str())),
        other => {
            warn!("request failed: {other}");
            Response::json(
                500,
                &Failure::new(format!("Error al realizar la predicción: {other}")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_years_works() {
        assert!(validate_years(0.0).is_ok());
        assert!(validate_years(50.0).is_ok());
        assert!(matches!(validate_years(-0.5), Err(Error::InvalidInput(_))));
        assert!(matches!(validate_years(50.5), Err(Error::InvalidInput(_))));
        assert!(matches!(validate_years(f64::NAN), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn failure_maps_errors_to_statuses() {
        assert_eq!(failure(&Error::InvalidInput(String::from("x"))).status, 400);
        assert_eq!(failure(&Error::ModelNotFitted).status, 500);
        assert_eq!(failure(&Error::InsufficientData(String::from("x"))).status, 500);
    }
}
