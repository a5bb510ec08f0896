use crate::core::engine::QuoteEngine;
use crate::core::policy::SunHoursPolicy;
use crate::domain::model::{Quote, QuoteInputs, QuoteRequest};
use crate::domain::ports::IrradianceProvider;
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{validate_non_negative, Validate};

/// Validate, look up irradiance, fall back if needed, then calculate.
pub struct QuoteService<P: IrradianceProvider> {
    provider: P,
    engine: QuoteEngine,
    policy: SunHoursPolicy,
}

impl<P: IrradianceProvider> QuoteService<P> {
    pub fn new(provider: P, engine: QuoteEngine, policy: SunHoursPolicy) -> Self {
        Self {
            provider,
            engine,
            policy,
        }
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    pub async fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        // Invalid requests never reach the network.
        request.validate()?;

        let irradiance = match request.coordinates {
            Some(point) => {
                tracing::debug!(
                    "Looking up irradiance for ({}, {})",
                    point.latitude,
                    point.longitude
                );
                let fetched = self
                    .provider
                    .fetch(point, request.month_of_year()?)
                    .await
                    .and_then(|summary| {
                        // a reading the engine would reject is as good as no reading
                        validate_non_negative("sun_hours_per_day", summary.sun_hours())
                            .map_err(|e| QuoteError::unavailable(e.to_string()))?;
                        Ok(summary)
                    });
                match fetched {
                    Ok(summary) => Some(summary),
                    Err(e) if e.is_data_unavailable() => {
                        tracing::warn!(
                            "⚠️ {}; using default of {} sun-hours/day",
                            e,
                            self.policy.default_sun_hours
                        );
                        None
                    }
                    Err(e) => return Err(e),
                }
            }
            None => {
                tracing::debug!("No coordinates supplied, skipping irradiance lookup");
                None
            }
        };

        let sun_hours = self.policy.resolve(irradiance.as_ref());
        tracing::info!(
            "☀️ Sizing with {:.2} sun-hours/day ({:?})",
            sun_hours.value,
            sun_hours.source
        );

        let inputs = QuoteInputs::from_request(request, sun_hours)?;
        let outputs = self.engine.calculate(&inputs);
        tracing::debug!(
            "Quote for '{}': {} kW, {} panels, payback {} months",
            inputs.address(),
            outputs.system_size_kw,
            outputs.panel_count,
            outputs.payback_months
        );

        Ok(Quote {
            inputs,
            irradiance,
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Coordinates, IrradianceSummary};
    use async_trait::async_trait;
    use chrono::Month;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Behaviour {
        Summary(f64),
        Unavailable,
        Broken,
    }

    #[derive(Clone)]
    struct MockProvider {
        behaviour: Arc<Behaviour>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour: Arc::new(behaviour),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IrradianceProvider for MockProvider {
        async fn fetch(&self, point: Coordinates, month: Option<Month>) -> Result<IrradianceSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match *self.behaviour {
                Behaviour::Summary(sun_hours) => Ok(IrradianceSummary {
                    average_annual_irradiance: sun_hours,
                    average_annual_sun_hours: sun_hours,
                    latitude: point.latitude,
                    longitude: point.longitude,
                    requested_month: month.map(|m| m.number_from_month()),
                    month_irradiance: None,
                    optimal_month: None,
                    temperature: None,
                    wind_speed: None,
                    humidity: None,
                }),
                Behaviour::Unavailable => Err(QuoteError::unavailable("mock outage")),
                Behaviour::Broken => Err(QuoteError::Io(std::io::Error::other("disk on fire"))),
            }
        }
    }

    fn request(coordinates: Option<Coordinates>) -> QuoteRequest {
        QuoteRequest {
            address: "1 Main Road, Pretoria".to_string(),
            usage_kwh: Some(500.0),
            bill_rands: None,
            tariff_per_kwh: 2.5,
            panel_wattage: 550,
            coordinates,
            month: None,
        }
    }

    fn service(provider: MockProvider) -> QuoteService<MockProvider> {
        QuoteService::new(provider, QuoteEngine::default(), SunHoursPolicy::new(5.0))
    }

    #[tokio::test]
    async fn test_measured_sun_hours_are_used() {
        let provider = MockProvider::new(Behaviour::Summary(6.0));
        let svc = service(provider.clone());

        let quote = svc
            .quote(&request(Some(Coordinates::new(-25.75, 28.19).unwrap())))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(quote.outputs.system_size_kw, 2.78);
        assert!(!quote.outputs.used_default_irradiance);
        assert_eq!(quote.irradiance.unwrap().latitude, -25.75);
    }

    #[tokio::test]
    async fn test_unavailable_falls_back_to_default() {
        let provider = MockProvider::new(Behaviour::Unavailable);
        let svc = service(provider.clone());

        let quote = svc
            .quote(&request(Some(Coordinates::new(-25.75, 28.19).unwrap())))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert!(quote.outputs.used_default_irradiance);
        assert_eq!(quote.outputs.sun_hours_per_day, 5.0);
        // 500 / 30 / 5
        assert_eq!(quote.outputs.system_size_kw, 3.33);
        assert!(quote.irradiance.is_none());
    }

    #[tokio::test]
    async fn test_negative_measured_sun_hours_fall_back_to_default() {
        let provider = MockProvider::new(Behaviour::Summary(-5.0));
        let svc = service(provider.clone());

        let quote = svc
            .quote(&request(Some(Coordinates::new(-25.75, 28.19).unwrap())))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert!(quote.outputs.used_default_irradiance);
        assert_eq!(quote.outputs.sun_hours_per_day, 5.0);
        assert!(quote.irradiance.is_none());
    }

    #[tokio::test]
    async fn test_non_finite_measured_sun_hours_fall_back_to_default() {
        let provider = MockProvider::new(Behaviour::Summary(f64::NAN));
        let svc = service(provider);

        let quote = svc
            .quote(&request(Some(Coordinates::new(-25.75, 28.19).unwrap())))
            .await
            .unwrap();

        assert!(quote.outputs.used_default_irradiance);
        assert_eq!(quote.outputs.system_size_kw, 3.33);
    }

    #[tokio::test]
    async fn test_no_coordinates_skips_lookup() {
        let provider = MockProvider::new(Behaviour::Summary(6.0));
        let svc = service(provider.clone());

        let quote = svc.quote(&request(None)).await.unwrap();

        assert_eq!(provider.calls(), 0);
        assert!(quote.outputs.used_default_irradiance);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_lookup() {
        let provider = MockProvider::new(Behaviour::Summary(6.0));
        let svc = service(provider.clone());

        let mut req = request(Some(Coordinates::new(-25.75, 28.19).unwrap()));
        req.usage_kwh = Some(0.0);
        req.bill_rands = Some(0.0);

        let err = svc.quote(&req).await.unwrap_err();
        assert!(matches!(err, QuoteError::Validation { .. }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_other_provider_errors_propagate() {
        let provider = MockProvider::new(Behaviour::Broken);
        let svc = service(provider);

        let err = svc
            .quote(&request(Some(Coordinates::new(-25.75, 28.19).unwrap())))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Io(_)));
    }

    #[test]
    fn test_service_is_reusable_across_requests() {
        let provider = MockProvider::new(Behaviour::Summary(6.0));
        let svc = service(provider.clone());
        let point = Coordinates::new(-29.85, 31.02).unwrap();

        let first = tokio_test::block_on(svc.quote(&request(Some(point)))).unwrap();
        let second = tokio_test::block_on(svc.quote(&request(Some(point)))).unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(first, second);
    }
}
