use crate::adapters::{GeolocationClient, HttpFetcher, IpLookupClient, PassPredictionClient};
use crate::core::state::PipelineState;
use crate::domain::model::PassList;
use crate::domain::ports::{ConfigProvider, GeoResolver, IpResolver, PassPredictor};
use crate::utils::error::{PassError, Result};
use crate::utils::validation::validate_url;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 依序執行 IP → 經緯度 → 過境時間，遇到第一個錯誤即停止
pub struct PassFinder<I, G, P> {
    ip_resolver: Arc<I>,
    geo_resolver: Arc<G>,
    predictor: Arc<P>,
}

impl<I, G, P> Clone for PassFinder<I, G, P> {
    fn clone(&self) -> Self {
        Self {
            ip_resolver: Arc::clone(&self.ip_resolver),
            geo_resolver: Arc::clone(&self.geo_resolver),
            predictor: Arc::clone(&self.predictor),
        }
    }
}

impl<I: fmt::Debug, G: fmt::Debug, P: fmt::Debug> fmt::Debug for PassFinder<I, G, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassFinder")
            .field("ip_resolver", &self.ip_resolver)
            .field("geo_resolver", &self.geo_resolver)
            .field("predictor", &self.predictor)
            .finish()
    }
}

/// 使用真實 HTTP 服務的組合
pub type HttpPassFinder = PassFinder<IpLookupClient, GeolocationClient, PassPredictionClient>;

impl HttpPassFinder {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;

        let ip_endpoint = validate_url("ip_endpoint", config.ip_endpoint())?;
        let geolocation_endpoint =
            validate_url("geolocation_endpoint", config.geolocation_endpoint())?;
        let pass_endpoint =
            validate_url("pass_prediction_endpoint", config.pass_prediction_endpoint())?;

        tracing::debug!(
            "Endpoints: ip={}, geolocation={}, passes={}",
            ip_endpoint,
            geolocation_endpoint,
            pass_endpoint
        );

        Ok(Self::new(
            IpLookupClient::new(fetcher.clone(), ip_endpoint),
            GeolocationClient::new(fetcher.clone(), geolocation_endpoint),
            PassPredictionClient::new(fetcher, pass_endpoint),
        ))
    }
}

impl<I, G, P> PassFinder<I, G, P>
where
    I: IpResolver + 'static,
    G: GeoResolver + 'static,
    P: PassPredictor + 'static,
{
    pub fn new(ip_resolver: I, geo_resolver: G, predictor: P) -> Self {
        Self {
            ip_resolver: Arc::new(ip_resolver),
            geo_resolver: Arc::new(geo_resolver),
            predictor: Arc::new(predictor),
        }
    }

    /// Future 形式：結果或錯誤恰好一個
    pub async fn next_passes(&self) -> Result<PassList> {
        self.run_stages().await
    }

    /// Callback 形式：在 Tokio runtime 上執行，callback 只會被呼叫一次。
    ///
    /// 必須在 runtime 內呼叫；回傳的 handle 可用來等待 callback 完成。
    pub fn next_passes_with_callback<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<PassList>) + Send + 'static,
    {
        let finder = self.clone();
        tokio::spawn(async move {
            let result = finder.run_stages().await;
            callback(result);
        })
    }

    async fn run_stages(&self) -> Result<PassList> {
        let mut state = transition(PipelineState::Start);

        let ip = self
            .ip_resolver
            .fetch_my_ip()
            .await
            .map_err(|e| failed(state, e))?;
        state = transition(state);

        let coords = self
            .geo_resolver
            .fetch_coords_by_ip(&ip)
            .await
            .map_err(|e| failed(state, e))?;
        state = transition(state);

        let passes = self
            .predictor
            .fetch_flyover_times(&coords)
            .await
            .map_err(|e| failed(state, e))?;
        transition(state);

        Ok(passes)
    }
}

fn transition(state: PipelineState) -> PipelineState {
    let next = state.advance();
    tracing::debug!("🔄 {} -> {}", state, next);
    next
}

// 錯誤原樣往上傳，不重新包裝
fn failed(state: PipelineState, err: PassError) -> PassError {
    tracing::error!("❌ {} -> {}: {}", state, state.fail(), err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Coordinates, IpAddress, PassWindow};
    use crate::utils::error::{ErrorKind, Service};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CallLog {
        ip: Arc<AtomicUsize>,
        geo: Arc<AtomicUsize>,
        passes: Arc<AtomicUsize>,
    }

    impl CallLog {
        fn counts(&self) -> (usize, usize, usize) {
            (
                self.ip.load(Ordering::SeqCst),
                self.geo.load(Ordering::SeqCst),
                self.passes.load(Ordering::SeqCst),
            )
        }
    }

    struct StubIp {
        respond: fn() -> Result<IpAddress>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IpResolver for StubIp {
        async fn fetch_my_ip(&self) -> Result<IpAddress> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)()
        }
    }

    struct StubGeo {
        respond: fn(&IpAddress) -> Result<Coordinates>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GeoResolver for StubGeo {
        async fn fetch_coords_by_ip(&self, ip: &IpAddress) -> Result<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(ip)
        }
    }

    struct StubPasses {
        respond: fn(&Coordinates) -> Result<PassList>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PassPredictor for StubPasses {
        async fn fetch_flyover_times(&self, coords: &Coordinates) -> Result<PassList> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(coords)
        }
    }

    fn ok_ip() -> Result<IpAddress> {
        Ok(IpAddress::new("1.2.3.4"))
    }

    fn ok_geo(ip: &IpAddress) -> Result<Coordinates> {
        assert_eq!(ip.as_str(), "1.2.3.4");
        Ok(Coordinates::new(45.5, -73.6))
    }

    fn ok_passes(coords: &Coordinates) -> Result<PassList> {
        assert_eq!(coords, &Coordinates::new(45.5, -73.6));
        Ok(vec![
            PassWindow { risetime: 1445931146, duration: 329 },
            PassWindow { risetime: 1445936948, duration: 619 },
        ])
    }

    fn finder(
        log: &CallLog,
        ip: fn() -> Result<IpAddress>,
        geo: fn(&IpAddress) -> Result<Coordinates>,
        passes: fn(&Coordinates) -> Result<PassList>,
    ) -> PassFinder<StubIp, StubGeo, StubPasses> {
        PassFinder::new(
            StubIp { respond: ip, calls: log.ip.clone() },
            StubGeo { respond: geo, calls: log.geo.clone() },
            StubPasses { respond: passes, calls: log.passes.clone() },
        )
    }

    #[tokio::test]
    async fn test_next_passes_runs_all_stages() {
        let log = CallLog::default();
        let finder = finder(&log, ok_ip, ok_geo, ok_passes);

        let passes = tokio_test::assert_ok!(finder.next_passes().await);

        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].risetime, 1445931146);
        assert_eq!(log.counts(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_ip_failure_skips_later_stages() {
        let log = CallLog::default();
        let finder = finder(
            &log,
            || {
                Err(PassError::UpstreamStatus {
                    service: Service::IpLookup,
                    status: 503,
                    body: "down".to_string(),
                })
            },
            ok_geo,
            ok_passes,
        );

        let err = tokio_test::assert_err!(finder.next_passes().await);

        assert_eq!(err.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(err.status(), Some(503));
        assert_eq!(log.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_geolocation_error_passes_through_unchanged() {
        let log = CallLog::default();
        let finder = finder(
            &log,
            ok_ip,
            |ip| {
                Err(PassError::GeolocationRejected {
                    queried_ip: ip.to_string(),
                    echoed_ip: Some("5.6.7.8".to_string()),
                    success: "false".to_string(),
                    message: "Reserved range".to_string(),
                    status: 200,
                })
            },
            ok_passes,
        );

        let err = finder.next_passes().await.unwrap_err();

        match err {
            PassError::GeolocationRejected {
                queried_ip,
                echoed_ip,
                message,
                ..
            } => {
                assert_eq!(queried_ip, "1.2.3.4");
                assert_eq!(echoed_ip.as_deref(), Some("5.6.7.8"));
                assert_eq!(message, "Reserved range");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(log.counts(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_prediction_parse_error_yields_no_list() {
        let log = CallLog::default();
        let finder = finder(&log, ok_ip, ok_geo, |_| {
            Err(PassError::parse(Service::PassPrediction, "response", "field is missing"))
        });

        let err = finder.next_passes().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(log.counts(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_callback_invoked_once_with_same_result() {
        let log = CallLog::default();
        let finder = finder(&log, ok_ip, ok_geo, ok_passes);

        let deferred = finder.next_passes().await.unwrap();

        let received: Arc<Mutex<Vec<Result<PassList>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let handle = finder.next_passes_with_callback(move |result| {
            sink.lock().unwrap().push(result);
        });
        handle.await.unwrap();

        let mut received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let from_callback = received.pop().unwrap().unwrap();
        assert_eq!(from_callback, deferred);
        assert_eq!(log.counts(), (2, 2, 2));
    }

    #[tokio::test]
    async fn test_callback_receives_error() {
        let log = CallLog::default();
        let finder = finder(
            &log,
            ok_ip,
            |_| Err(PassError::parse(Service::Geolocation, "latitude", "field is missing")),
            ok_passes,
        );

        let (tx, rx) = tokio::sync::oneshot::channel();
        let _handle = finder.next_passes_with_callback(move |result| {
            let _ = tx.send(result);
        });

        let result = rx.await.unwrap();
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.service(), Some(Service::Geolocation));
        assert_eq!(log.counts(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_concurrent_invocations_are_independent() {
        let log = CallLog::default();
        let finder = finder(&log, ok_ip, ok_geo, ok_passes);

        let (a, b) = tokio::join!(finder.next_passes(), finder.next_passes());

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(log.counts(), (2, 2, 2));
    }
}
