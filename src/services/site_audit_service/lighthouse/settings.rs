use crate::models::DeviceProfile;

/// Page-load ceiling handed to Lighthouse, shared by both profiles.
pub const MAX_WAIT_FOR_LOAD_MS: u64 = 100_000;

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 7.0; Moto G (4)) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4690.0 Mobile Safari/537.36 Chrome-Lighthouse";
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4690.0 Safari/537.36 Chrome-Lighthouse";

#[derive(Debug, Clone, PartialEq)]
pub struct Throttling {
    pub rtt_ms: u32,
    pub throughput_kbps: u32,
    pub cpu_slowdown_multiplier: u32,
    pub request_latency_ms: u32,
    pub download_throughput_kbps: u32,
    pub upload_throughput_kbps: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenEmulation {
    pub mobile: bool,
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

/// Emulation block passed to every Lighthouse pass of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSettings {
    pub form_factor: DeviceProfile,
    /// `None` means Lighthouse uses the connection as provided.
    pub throttling: Option<Throttling>,
    pub screen: ScreenEmulation,
    pub user_agent: &'static str,
    pub max_wait_for_load_ms: u64,
}

impl DeviceSettings {
    pub fn for_profile(profile: DeviceProfile) -> Self {
        match profile {
            DeviceProfile::Mobile => Self {
                form_factor: DeviceProfile::Mobile,
                throttling: Some(Throttling {
                    rtt_ms: 40,
                    throughput_kbps: 10 * 1024,
                    cpu_slowdown_multiplier: 4,
                    request_latency_ms: 0,
                    download_throughput_kbps: 0,
                    upload_throughput_kbps: 0,
                }),
                screen: ScreenEmulation {
                    mobile: true,
                    width: 360,
                    height: 640,
                    device_scale_factor: 2.625,
                },
                user_agent: MOBILE_USER_AGENT,
                max_wait_for_load_ms: MAX_WAIT_FOR_LOAD_MS,
            },
            DeviceProfile::Desktop => Self {
                form_factor: DeviceProfile::Desktop,
                throttling: None,
                screen: ScreenEmulation {
                    mobile: false,
                    width: 1350,
                    height: 940,
                    device_scale_factor: 1.0,
                },
                user_agent: DESKTOP_USER_AGENT,
                max_wait_for_load_ms: MAX_WAIT_FOR_LOAD_MS,
            },
        }
    }

    pub fn throttling_method(&self) -> &'static str {
        if self.throttling.is_some() {
            "simulate"
        } else {
            "provided"
        }
    }

    /// Renders the settings as Lighthouse CLI flags.
    pub fn cli_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--max-wait-for-load={}", self.max_wait_for_load_ms),
            format!("--form-factor={}", self.form_factor),
            format!("--throttling-method={}", self.throttling_method()),
            format!("--screenEmulation.mobile={}", self.screen.mobile),
            format!("--screenEmulation.width={}", self.screen.width),
            format!("--screenEmulation.height={}", self.screen.height),
            format!(
                "--screenEmulation.deviceScaleFactor={}",
                self.screen.device_scale_factor
            ),
            "--screenEmulation.disabled=false".to_string(),
            format!("--emulatedUserAgent={}", self.user_agent),
        ];

        if let Some(throttling) = &self.throttling {
            args.extend([
                format!("--throttling.rttMs={}", throttling.rtt_ms),
                format!("--throttling.throughputKbps={}", throttling.throughput_kbps),
                format!(
                    "--throttling.cpuSlowdownMultiplier={}",
                    throttling.cpu_slowdown_multiplier
                ),
                format!("--throttling.requestLatencyMs={}", throttling.request_latency_ms),
                format!(
                    "--throttling.downloadThroughputKbps={}",
                    throttling.download_throughput_kbps
                ),
                format!(
                    "--throttling.uploadThroughputKbps={}",
                    throttling.upload_throughput_kbps
                ),
            ]);
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_simulates_throttling() {
        let settings = DeviceSettings::for_profile(DeviceProfile::Mobile);
        let args = settings.cli_args();

        assert_eq!(settings.throttling_method(), "simulate");
        assert!(args.contains(&"--form-factor=mobile".to_string()));
        assert!(args.contains(&"--throttling.rttMs=40".to_string()));
        assert!(args.contains(&"--throttling.throughputKbps=10240".to_string()));
        assert!(args.contains(&"--throttling.cpuSlowdownMultiplier=4".to_string()));
        assert!(args.contains(&"--screenEmulation.deviceScaleFactor=2.625".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--emulatedUserAgent=") && a.contains("Mobile Safari")));
    }

    #[test]
    fn desktop_uses_provided_connection() {
        let settings = DeviceSettings::for_profile(DeviceProfile::Desktop);
        let args = settings.cli_args();

        assert_eq!(settings.throttling_method(), "provided");
        assert!(args.contains(&"--throttling-method=provided".to_string()));
        assert!(args.contains(&"--screenEmulation.width=1350".to_string()));
        assert!(args.contains(&"--screenEmulation.deviceScaleFactor=1".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--throttling.")));
    }

    #[test]
    fn profiles_share_the_load_ceiling() {
        for profile in [DeviceProfile::Mobile, DeviceProfile::Desktop] {
            let args = DeviceSettings::for_profile(profile).cli_args();
            assert!(args.contains(&"--max-wait-for-load=100000".to_string()));
        }
    }
}
