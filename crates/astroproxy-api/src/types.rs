// Enumerations and request payloads for the AstroProxy API.
//
// Each enum carries two spellings: the kebab-case symbolic name used for
// parsing (`FromStr`, CLI values) and the provider's wire token, produced
// only through `WireToken`. The two must not be mixed up; the provider
// spells residential as "Residental".

use strum::{EnumIter, EnumString, VariantNames};

use crate::params::{ParamValue, Params, WireToken};

// ── Enumerations ─────────────────────────────────────────────────────

/// Carrier category of the exit IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum NetworkType {
    Business,
    College,
    Hosting,
    Mobile,
    Residential,
    Travel,
}

impl WireToken for NetworkType {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Business => "Business",
            Self::College => "College",
            Self::Hosting => "Hosting",
            Self::Mobile => "Mobile",
            Self::Residential => "Residental",
            Self::Travel => "Travel",
        };
        token.into()
    }
}

/// What triggers an IP rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RotationTrigger {
    /// Elapsed time; the unit and interval live on [`Rotation`].
    Time,
    /// Rotation on demand through the port's change-IP link.
    Link,
    /// Every proxied request.
    Request,
}

impl WireToken for RotationTrigger {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Time => "time",
            Self::Link => "link",
            Self::Request => "request",
        };
        token.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RotationTimeUnit {
    Hours,
    Minutes,
}

impl WireToken for RotationTimeUnit {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Hours => "hours",
            Self::Minutes => "minutes",
        };
        token.into()
    }
}

/// Whether the port's traffic volume is capped. Sent as an integer flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TrafficMode {
    Unlimited,
    Limited,
}

impl WireToken for TrafficMode {
    fn wire_token(&self) -> ParamValue {
        match self {
            Self::Unlimited => ParamValue::Int(1),
            Self::Limited => ParamValue::Int(0),
        }
    }
}

/// Platform the port's VPN profile is generated for. Update-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VpnClient {
    Android,
    Ios,
    Windows,
    Macos,
    Mikrotik,
}

impl WireToken for VpnClient {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Mikrotik => "mikrotik",
        };
        token.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OrderField {
    Random,
    Created,
    Id,
    Name,
}

impl WireToken for OrderField {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Random => "random",
            Self::Created => "created",
            Self::Id => "id",
            Self::Name => "name",
        };
        token.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, VariantNames, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl WireToken for OrderDirection {
    fn wire_token(&self) -> ParamValue {
        let token = match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        };
        token.into()
    }
}

// ── Composite values ─────────────────────────────────────────────────

/// Sort order for the port listing. Defaults to newest id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            field: OrderField::Id,
            direction: OrderDirection::Desc,
        }
    }
}

impl Ordering {
    pub fn new(field: OrderField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    pub(crate) fn to_params(self) -> Params {
        Params::new()
            .set_token("order", &self.field)
            .set_token("orderDirection", &self.direction)
    }
}

/// IP rotation policy of a port.
///
/// `time_unit` is only meaningful with [`RotationTrigger::Time`]; absent
/// parts are left out of the request entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub trigger: RotationTrigger,
    pub time_unit: Option<RotationTimeUnit>,
    pub interval: Option<u32>,
}

impl Rotation {
    /// Rotate every `interval` hours or minutes.
    pub fn by_time(unit: RotationTimeUnit, interval: u32) -> Self {
        Self {
            trigger: RotationTrigger::Time,
            time_unit: Some(unit),
            interval: Some(interval),
        }
    }

    /// Rotate when the port's change-IP link is hit.
    pub fn by_link() -> Self {
        Self {
            trigger: RotationTrigger::Link,
            time_unit: None,
            interval: None,
        }
    }

    /// Rotate on every request.
    pub fn by_request() -> Self {
        Self {
            trigger: RotationTrigger::Request,
            time_unit: None,
            interval: None,
        }
    }

    pub(crate) fn to_params(self) -> Params {
        Params::new()
            .set_token("rotation_by", &self.trigger)
            .set_token_opt("rotation_time_type", self.time_unit.as_ref())
            .set_opt("rotation_time", self.interval)
    }
}

/// Input for port creation and cost calculation.
///
/// Both operations take exactly this shape; only the endpoint differs.
#[derive(Debug, Clone, PartialEq)]
pub struct PortSpec {
    pub name: String,
    pub network: NetworkType,
    pub country: String,
    pub city: String,
    pub rotation: Rotation,
    pub traffic: TrafficMode,
    /// Traffic volume in GB.
    pub volume: f64,
    pub username: String,
    pub password: String,
    /// IP address to bind the port to, if any.
    pub ip: Option<String>,
}

impl PortSpec {
    pub(crate) fn to_params(&self) -> Params {
        Params::new()
            .set("name", &self.name)
            .set_token("network", &self.network)
            .set("country", &self.country)
            .set("city", &self.city)
            .extend(self.rotation.to_params())
            .set_token("is_unlimited", &self.traffic)
            .set("volume", self.volume)
            .set("username", &self.username)
            .set("password", &self.password)
            .set_opt("ip", self.ip.as_ref())
    }
}

/// Partial update of an existing port. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortUpdate {
    pub name: Option<String>,
    pub vpn: Option<VpnClient>,
    pub rotation: Option<Rotation>,
    pub traffic: Option<TrafficMode>,
}

impl PortUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn vpn(mut self, vpn: VpnClient) -> Self {
        self.vpn = Some(vpn);
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn traffic(mut self, traffic: TrafficMode) -> Self {
        self.traffic = Some(traffic);
        self
    }

    pub(crate) fn to_params(&self) -> Params {
        let rotation = self.rotation.map(Rotation::to_params).unwrap_or_default();
        Params::new()
            .set_opt("name", self.name.as_ref())
            .set_token_opt("vpn", self.vpn.as_ref())
            .extend(rotation)
            .set_token_opt("is_unlimited", self.traffic.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    fn spec() -> PortSpec {
        PortSpec {
            name: "scraper-1".into(),
            network: NetworkType::Residential,
            country: "DE".into(),
            city: "Berlin".into(),
            rotation: Rotation::by_time(RotationTimeUnit::Minutes, 15),
            traffic: TrafficMode::Limited,
            volume: 2.5,
            username: "user".into(),
            password: "pass".into(),
            ip: None,
        }
    }

    #[test]
    fn residential_uses_provider_spelling() {
        assert_eq!(
            NetworkType::Residential.wire_token(),
            ParamValue::Text("Residental".into())
        );
        assert_eq!("residential".parse::<NetworkType>().unwrap(), NetworkType::Residential);
    }

    #[test]
    fn traffic_mode_is_integer_flag() {
        assert_eq!(TrafficMode::Unlimited.wire_token(), ParamValue::Int(1));
        assert_eq!(TrafficMode::Limited.wire_token(), ParamValue::Int(0));
    }

    #[test]
    fn string_tokens_match_symbolic_names_except_network() {
        for vpn in VpnClient::iter() {
            let name: &str = VpnClient::VARIANTS[vpn as usize];
            assert_eq!(vpn.wire_token(), ParamValue::Text(name.into()));
        }
        for field in OrderField::iter() {
            let name: &str = OrderField::VARIANTS[field as usize];
            assert_eq!(field.wire_token(), ParamValue::Text(name.into()));
        }
    }

    #[test]
    fn default_ordering_is_id_desc() {
        let pairs = Ordering::default().to_params().into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("order", ParamValue::Text("id".into())),
                ("orderDirection", ParamValue::Text("desc".into())),
            ]
        );
    }

    #[test]
    fn port_spec_params_in_order_without_ip() {
        let keys: Vec<_> = spec().to_params().into_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "network",
                "country",
                "city",
                "rotation_by",
                "rotation_time_type",
                "rotation_time",
                "is_unlimited",
                "volume",
                "username",
                "password",
            ]
        );
    }

    #[test]
    fn port_spec_includes_ip_when_set() {
        let spec = PortSpec {
            ip: Some("203.0.113.7".into()),
            ..spec()
        };
        assert_eq!(
            spec.to_params().get("ip"),
            Some(&ParamValue::Text("203.0.113.7".into()))
        );
    }

    #[test]
    fn link_rotation_omits_time_fields() {
        let params = Rotation::by_link().to_params();
        assert_eq!(params.get("rotation_by"), Some(&ParamValue::Text("link".into())));
        assert!(params.get("rotation_time_type").is_none());
        assert_eq!(params.into_pairs().len(), 1);
    }

    #[test]
    fn empty_update_sends_nothing() {
        assert!(PortUpdate::default().to_params().is_empty());
    }

    #[test]
    fn partial_update_sends_only_set_fields() {
        let pairs = PortUpdate::default()
            .vpn(VpnClient::Mikrotik)
            .traffic(TrafficMode::Unlimited)
            .to_params()
            .into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("vpn", ParamValue::Text("mikrotik".into())),
                ("is_unlimited", ParamValue::Int(1)),
            ]
        );
    }
}
