//! Discovery: a bounded-time scan that populates the registry.
//!
//! Two probes share one session:
//! - the **bridge probe** asks each candidate address to identify itself as
//!   a lighting bridge; the first bridge found is paired and its lights
//!   registered
//! - the **generic probe** opens TCP connections to a few well-known ports
//!   and registers every host that answers as a bare network device
//!
//! Both run as fixed-size worker pools pulling jobs from a shared queue and
//! reporting hits on one channel. A session deadline cancels whatever is
//! still in flight without waiting for it.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use hestia_domain::device::{Capabilities, Capability, Device, DeviceKind, Platform};
use hestia_domain::error::HestiaError;
use hestia_domain::id::DeviceId;

use crate::bootstrap;
use crate::ports::{BridgeClient, BridgeDescriptor, BridgeHandle, BridgeLight, PortProbe};
use crate::registry::DeviceRegistry;

/// Tunables of a discovery session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// First three octets of the scanned /24 network.
    pub network_base: [u8; 3],
    /// This host's address, skipped by both probes.
    pub local_address: Option<Ipv4Addr>,
    /// Last octets asked to identify as a bridge.
    pub bridge_hosts: RangeInclusive<u8>,
    /// Last octets probed on [`ports`](Self::ports).
    pub probe_hosts: RangeInclusive<u8>,
    pub ports: Vec<u16>,
    /// Bound on the whole session.
    pub timeout: Duration,
    /// Bound on a single identification or connection attempt.
    pub probe_timeout: Duration,
    /// Workers per probe.
    pub concurrency: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            network_base: [192, 168, 1],
            local_address: None,
            bridge_hosts: 1..=20,
            probe_hosts: 1..=4,
            ports: vec![80, 8080],
            timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            concurrency: 8,
        }
    }
}

impl DiscoveryConfig {
    fn host(&self, last: u8) -> Option<Ipv4Addr> {
        let [a, b, c] = self.network_base;
        let address = Ipv4Addr::new(a, b, c, last);
        (Some(address) != self.local_address).then_some(address)
    }

    /// Addresses the bridge probe will try, in order.
    #[must_use]
    pub fn bridge_candidates(&self) -> Vec<IpAddr> {
        self.bridge_hosts
            .clone()
            .filter_map(|last| self.host(last))
            .map(IpAddr::V4)
            .collect()
    }

    /// Socket addresses the generic probe will try, in order.
    #[must_use]
    pub fn probe_candidates(&self) -> Vec<SocketAddr> {
        self.probe_hosts
            .clone()
            .filter_map(|last| self.host(last))
            .flat_map(|host| {
                self.ports
                    .iter()
                    .map(move |port| SocketAddr::new(IpAddr::V4(host), *port))
            })
            .collect()
    }
}

/// What a discovery session found and did.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Ids registered by this session, bridge lights first.
    pub registered: Vec<DeviceId>,
    /// The paired bridge, if any.
    pub bridge: Option<BridgeHandle>,
    /// Whether the virtual bootstrap set was registered.
    pub bootstrapped: bool,
    pub timed_out: bool,
    pub elapsed: Duration,
    /// Non-fatal problems: pairing failures, rejected registrations, the
    /// session timeout.
    pub warnings: Vec<HestiaError>,
}

enum Hit {
    Bridge(BridgeDescriptor),
    Paired {
        handle: BridgeHandle,
        lights: Vec<BridgeLight>,
    },
    PairingFailed {
        descriptor: BridgeDescriptor,
        error: HestiaError,
    },
    Port(SocketAddr),
}

type ProbeFuture = Pin<Box<dyn Future<Output = Option<Hit>> + Send>>;

enum Step {
    Hit(Hit),
    Joined(Option<Result<(), JoinError>>),
    Deadline,
}

#[derive(Default)]
struct Findings {
    bridge: Option<BridgeDescriptor>,
    paired: Option<(BridgeHandle, Vec<BridgeLight>)>,
    ports: Vec<SocketAddr>,
    warnings: Vec<HestiaError>,
}

/// Runs discovery sessions against the given bridge client and port probe.
pub struct DiscoveryService<B, P> {
    bridge: Arc<B>,
    probe: Arc<P>,
    config: DiscoveryConfig,
}

impl<B, P> DiscoveryService<B, P>
where
    B: BridgeClient + 'static,
    P: PortProbe + 'static,
{
    pub fn new(bridge: Arc<B>, probe: Arc<P>, config: DiscoveryConfig) -> Self {
        Self {
            bridge,
            probe,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run one session and register what it found. Never fails: problems
    /// end up in [`DiscoveryReport::warnings`].
    #[tracing::instrument(skip_all, fields(network = ?self.config.network_base, timeout = ?self.config.timeout))]
    pub async fn discover(&self, registry: &DeviceRegistry) -> DiscoveryReport {
        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let session = CancellationToken::new();
        let bridge_pool = session.child_token();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();

        spawn_pool(
            &mut workers,
            self.config.bridge_candidates(),
            self.config.concurrency,
            &bridge_pool,
            &tx,
            identify_job(Arc::clone(&self.bridge), self.config.probe_timeout),
        );
        spawn_pool(
            &mut workers,
            self.config.probe_candidates(),
            self.config.concurrency,
            &session,
            &tx,
            connect_job(Arc::clone(&self.probe), self.config.probe_timeout),
        );

        let mut findings = Findings::default();
        let mut timed_out = false;
        loop {
            let step = tokio::select! {
                biased;
                Some(hit) = rx.recv() => Step::Hit(hit),
                joined = workers.join_next() => Step::Joined(joined),
                () = tokio::time::sleep_until(deadline) => Step::Deadline,
            };
            match step {
                Step::Hit(hit) => {
                    if let Some(descriptor) = findings.record(hit) {
                        // First bridge wins: stop asking other hosts and pair.
                        bridge_pool.cancel();
                        self.spawn_pairing(&mut workers, &session, &tx, descriptor);
                    }
                }
                Step::Joined(None) => break,
                Step::Joined(Some(Err(err))) if err.is_panic() => {
                    tracing::error!(error = %err, "discovery worker panicked");
                }
                Step::Joined(Some(_)) => {}
                Step::Deadline => {
                    timed_out = true;
                    break;
                }
            }
        }

        session.cancel();
        workers.abort_all();
        if !timed_out {
            while let Ok(hit) = rx.try_recv() {
                // Pairing can no longer run once the session is over.
                if !matches!(hit, Hit::Bridge(_)) {
                    findings.record(hit);
                }
            }
        }

        let mut report = DiscoveryReport {
            timed_out,
            ..DiscoveryReport::default()
        };
        if timed_out {
            tracing::warn!("discovery session timed out");
            report
                .warnings
                .push(HestiaError::DiscoveryTimeout(self.config.timeout));
        }
        report.warnings.append(&mut findings.warnings);
        self.register(registry, findings, &mut report);

        if report.registered.is_empty() {
            match bootstrap::seed(registry) {
                Ok(ids) => {
                    report.bootstrapped = true;
                    report.registered = ids;
                }
                Err(err) => report.warnings.push(err),
            }
        }

        report.elapsed = started.elapsed();
        tracing::info!(
            registered = report.registered.len(),
            bridge = report.bridge.is_some(),
            bootstrapped = report.bootstrapped,
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "discovery finished"
        );
        report
    }

    fn spawn_pairing(
        &self,
        workers: &mut JoinSet<()>,
        session: &CancellationToken,
        tx: &mpsc::UnboundedSender<Hit>,
        descriptor: BridgeDescriptor,
    ) {
        tracing::info!(address = %descriptor.address, bridge_id = %descriptor.bridge_id, "bridge found, pairing");
        let bridge = Arc::clone(&self.bridge);
        let cancel = session.clone();
        let tx = tx.clone();
        workers.spawn(async move {
            let hit = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                hit = pair_and_list(bridge.as_ref(), descriptor) => hit,
            };
            // The session may already be over; the hit is then dropped.
            let _ = tx.send(hit);
        });
    }

    /// Register bridge lights first, then generic hosts not claimed by the
    /// bridge or already registered.
    fn register(&self, registry: &DeviceRegistry, findings: Findings, report: &mut DiscoveryReport) {
        let bridge_address = findings.bridge.as_ref().map(|d| d.address);

        if let Some((handle, lights)) = findings.paired {
            for light in lights {
                match bridge_light(&light).and_then(|device| registry.register(device)) {
                    Ok(id) => report.registered.push(id),
                    Err(err) => {
                        tracing::warn!(light = %light.name, error = %err, "bridge light skipped");
                        report.warnings.push(err);
                    }
                }
            }
            report.bridge = Some(handle);
        }

        let mut ports = findings.ports;
        ports.sort_unstable();
        for address in ports {
            if Some(address.ip()) == bridge_address {
                tracing::debug!(%address, "port hit belongs to the bridge");
                continue;
            }
            let id = DeviceId::slugged("network_device", &address.ip().to_string());
            if registry.contains(&id) {
                tracing::debug!(%address, "host already registered");
                continue;
            }
            match network_device(id, address).and_then(|device| registry.register(device)) {
                Ok(id) => report.registered.push(id),
                Err(err) => report.warnings.push(err),
            }
        }
    }
}

impl Findings {
    /// Record a hit. Returns the descriptor of a newly claimed bridge.
    fn record(&mut self, hit: Hit) -> Option<BridgeDescriptor> {
        match hit {
            Hit::Bridge(descriptor) => {
                if self.bridge.is_some() {
                    tracing::debug!(address = %descriptor.address, "additional bridge ignored");
                    return None;
                }
                self.bridge = Some(descriptor.clone());
                Some(descriptor)
            }
            Hit::Paired { handle, lights } => {
                tracing::info!(lights = lights.len(), "bridge paired");
                self.paired = Some((handle, lights));
                None
            }
            Hit::PairingFailed { descriptor, error } => {
                tracing::warn!(address = %descriptor.address, error = %error, "bridge pairing failed");
                self.warnings.push(error);
                None
            }
            Hit::Port(address) => {
                tracing::debug!(%address, "port open");
                self.ports.push(address);
                None
            }
        }
    }
}

/// Spawn up to `concurrency` workers that drain `jobs` until the queue is
/// empty or `cancel` fires.
fn spawn_pool<T, F, Fut>(
    workers: &mut JoinSet<()>,
    jobs: Vec<T>,
    concurrency: usize,
    cancel: &CancellationToken,
    tx: &mpsc::UnboundedSender<Hit>,
    job: F,
) where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Hit>> + Send,
{
    let size = concurrency.clamp(1, jobs.len().max(1));
    let queue = Arc::new(Mutex::new(jobs.into_iter()));
    let job = Arc::new(job);
    for _ in 0..size {
        let queue = Arc::clone(&queue);
        let job = Arc::clone(&job);
        let cancel = cancel.clone();
        let tx = tx.clone();
        workers.spawn(async move {
            loop {
                let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                let Some(item) = next else { break };
                let hit = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    hit = (*job)(item) => hit,
                };
                if let Some(hit) = hit {
                    if tx.send(hit).is_err() {
                        break;
                    }
                }
            }
        });
    }
}

fn identify_job<B: BridgeClient + 'static>(
    bridge: Arc<B>,
    timeout: Duration,
) -> impl Fn(IpAddr) -> ProbeFuture + Send + Sync + 'static {
    move |address| {
        let bridge = Arc::clone(&bridge);
        Box::pin(async move {
            match tokio::time::timeout(timeout, bridge.identify(address)).await {
                Ok(Ok(Some(descriptor))) => Some(Hit::Bridge(descriptor)),
                Ok(Ok(None)) => None,
                Ok(Err(err)) => {
                    tracing::debug!(%address, error = %err, "identification failed");
                    None
                }
                Err(_) => {
                    tracing::debug!(%address, "identification timed out");
                    None
                }
            }
        })
    }
}

fn connect_job<P: PortProbe + 'static>(
    probe: Arc<P>,
    timeout: Duration,
) -> impl Fn(SocketAddr) -> ProbeFuture + Send + Sync + 'static {
    move |address| {
        let probe = Arc::clone(&probe);
        Box::pin(async move {
            let open = tokio::time::timeout(timeout, probe.is_open(address, timeout))
                .await
                .unwrap_or(false);
            open.then_some(Hit::Port(address))
        })
    }
}

async fn pair_and_list<B: BridgeClient>(bridge: &B, descriptor: BridgeDescriptor) -> Hit {
    let handle = match bridge.pair(&descriptor).await {
        Ok(handle) => handle,
        Err(error) => return Hit::PairingFailed { descriptor, error },
    };
    match bridge.list_lights(&handle).await {
        Ok(lights) => Hit::Paired { handle, lights },
        Err(error) => Hit::PairingFailed { descriptor, error },
    }
}

fn bridge_light(light: &BridgeLight) -> Result<Device, HestiaError> {
    Device::builder()
        .id(DeviceId::slugged("bridge", &light.name))
        .kind(DeviceKind::Light)
        .name(light.name.clone())
        .platform(Platform::BridgeBacked)
        .address(light.key.clone())
        .capabilities([Capability::OnOff, Capability::Brightness, Capability::Color])
        .build()
}

fn network_device(id: DeviceId, address: SocketAddr) -> Result<Device, HestiaError> {
    Device::builder()
        .id(id)
        .kind(DeviceKind::Unknown)
        .name(format!("Device at {}", address.ip()))
        .platform(Platform::Network)
        .address(address.to_string())
        .capabilities(Capabilities::none())
        .build()
}
