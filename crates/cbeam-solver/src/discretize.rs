//! Beam discretization and property interpolation.
//!
//! Inputs are given at arbitrary stations along the beam. They are mapped onto
//! a uniform arclength grid of `nel` elements by piecewise-linear interpolation:
//! node positions and per-node sections are sampled at the grid nodes,
//! per-element sections and the section rotation at the grid midpoints.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::elements::{BeamSection, Material};
use crate::error::{BeamError, Result};
use crate::interp::{cumulative_arclength, interp_many, linspace, midpoints};
use crate::types::{DEFAULT_AREA, DEFAULT_TORSION_CONSTANT, DEFAULT_YOUNG_MODULUS, ElementType};

/// Beam geometry: overall length, span stations or node coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamGeometry {
    /// Straight beam of the given length along x
    Length(f64),
    /// Stations along x
    Span(Vec<f64>),
    /// Stations in the x-z plane, `[x, z]`
    Planar(Vec<[f64; 2]>),
    /// Stations in space, `[x, y, z]`
    Nodes(Vec<[f64; 3]>),
}

impl BeamGeometry {
    /// Number of stations defined by the geometry itself (`None` for `Length`).
    pub fn num_stations(&self) -> Option<usize> {
        match self {
            BeamGeometry::Length(_) => None,
            BeamGeometry::Span(x) => Some(x.len()),
            BeamGeometry::Planar(p) => Some(p.len()),
            BeamGeometry::Nodes(p) => Some(p.len()),
        }
    }

    /// Station coordinates, `n` stations for `Length`.
    fn stations(&self, n: usize) -> Result<Vec<Vector3<f64>>> {
        Ok(match self {
            BeamGeometry::Length(l) => {
                if !(*l > 0.0) {
                    return Err(BeamError::config(format!(
                        "Beam length must be positive, got {}",
                        l
                    )));
                }
                linspace(0.0, *l, n)
                    .into_iter()
                    .map(|x| Vector3::new(x, 0.0, 0.0))
                    .collect()
            }
            BeamGeometry::Span(x) => x.iter().map(|&x| Vector3::new(x, 0.0, 0.0)).collect(),
            BeamGeometry::Planar(p) => p.iter().map(|&[x, z]| Vector3::new(x, 0.0, z)).collect(),
            BeamGeometry::Nodes(p) => p.iter().map(|&[x, y, z]| Vector3::new(x, y, z)).collect(),
        })
    }
}

/// A physical property, constant or given at every station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    Uniform(f64),
    Distributed(Vec<f64>),
}

impl Default for Profile {
    fn default() -> Self {
        Profile::Uniform(0.0)
    }
}

impl Profile {
    fn num_stations(&self) -> Option<usize> {
        match self {
            Profile::Uniform(_) => None,
            Profile::Distributed(v) => Some(v.len()),
        }
    }

    fn values(&self, n: usize) -> Vec<f64> {
        match self {
            Profile::Uniform(v) => vec![*v; n],
            Profile::Distributed(v) => v.clone(),
        }
    }
}

impl From<f64> for Profile {
    fn from(v: f64) -> Self {
        Profile::Uniform(v)
    }
}

impl From<Vec<f64>> for Profile {
    fn from(v: Vec<f64>) -> Self {
        Profile::Distributed(v)
    }
}

/// Physical inputs of the beam, per station.
///
/// Required: `m`, `eix`, `eiy`, and either `ea` or both `e` and `area`.
/// Defaults: `E = 211e9`, `G = E / 2.6`, `EIz = EIy`, `A = 100`, `EA = E A`,
/// `Kt = 100`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamProperties {
    /// Mass per unit length [kg/m]
    pub m: Option<Profile>,
    pub eix: Option<Profile>,
    pub eiy: Option<Profile>,
    pub eiz: Option<Profile>,
    pub ea: Option<Profile>,
    pub area: Option<Profile>,
    pub kt: Option<Profile>,
    /// Young's modulus [Pa]
    pub e: Option<f64>,
    /// Shear modulus [Pa]
    pub g: Option<f64>,
    /// Rotation of the section principal axes about the tangent [rad]
    pub phi: Option<Profile>,
}

impl BeamProperties {
    /// Check that every required property is present or derivable.
    pub fn validate(&self) -> Result<()> {
        if self.m.is_none() {
            return Err(BeamError::config("For frame3d*, provide m"));
        }
        if self.eix.is_none() {
            return Err(BeamError::config("For frame3d*, provide EIx"));
        }
        if self.eiy.is_none() {
            return Err(BeamError::config("For frame3d*, provide EIy"));
        }
        if self.ea.is_none() && (self.e.is_none() || self.area.is_none()) {
            return Err(BeamError::config("For frame3d*, provide EA (or both E and A)"));
        }
        Ok(())
    }

    pub fn material(&self) -> Material {
        let e = self.e.unwrap_or(DEFAULT_YOUNG_MODULUS);
        match self.g {
            Some(g) => Material::new(e, g),
            None => Material::from_young(e),
        }
    }

    fn profiles(&self) -> impl Iterator<Item = (&'static str, &Profile)> {
        [
            ("m", self.m.as_ref()),
            ("EIx", self.eix.as_ref()),
            ("EIy", self.eiy.as_ref()),
            ("EIz", self.eiz.as_ref()),
            ("EA", self.ea.as_ref()),
            ("A", self.area.as_ref()),
            ("Kt", self.kt.as_ref()),
            ("phi", self.phi.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, p)| p.map(|p| (name, p)))
    }
}

/// Per-station property arrays after defaults are applied.
struct StationData {
    m: Vec<f64>,
    eix: Vec<f64>,
    eiy: Vec<f64>,
    eiz: Vec<f64>,
    ea: Vec<f64>,
    area: Vec<f64>,
    kt: Vec<f64>,
    phi: Option<Vec<f64>>,
}

impl StationData {
    fn new(props: &BeamProperties, material: &Material, n: usize) -> Self {
        let get = |p: &Option<Profile>| p.as_ref().map(|p| p.values(n));
        let eiy = get(&props.eiy).unwrap_or_else(|| vec![0.0; n]);
        let area = get(&props.area).unwrap_or_else(|| vec![DEFAULT_AREA; n]);
        let ea = get(&props.ea).unwrap_or_else(|| area.iter().map(|a| material.e * a).collect());
        StationData {
            m: get(&props.m).unwrap_or_else(|| vec![0.0; n]),
            eix: get(&props.eix).unwrap_or_else(|| vec![0.0; n]),
            eiz: get(&props.eiz).unwrap_or_else(|| eiy.clone()),
            eiy,
            ea,
            area,
            kt: get(&props.kt).unwrap_or_else(|| vec![DEFAULT_TORSION_CONSTANT; n]),
            phi: get(&props.phi),
        }
    }

    fn sample(&self, s: &[f64], s0: &[f64]) -> Vec<BeamSection> {
        let at = |v: &[f64]| interp_many(s, s0, v);
        let (m, eix, eiy, eiz) = (at(&self.m), at(&self.eix), at(&self.eiy), at(&self.eiz));
        let (ea, area, kt) = (at(&self.ea), at(&self.area), at(&self.kt));
        (0..s.len())
            .map(|i| BeamSection {
                m: m[i],
                eix: eix[i],
                eiy: eiy[i],
                eiz: eiz[i],
                ea: ea[i],
                area: area[i],
                kt: kt[i],
            })
            .collect()
    }
}

/// Discretized beam: nodes and sampled sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretization {
    /// Node positions, ordered along the beam
    pub nodes: Vec<Vector3<f64>>,
    /// Arclength of each node from the first one
    pub s_span: Vec<f64>,
    /// Sections at element midpoints
    pub element_sections: Vec<BeamSection>,
    /// Sections at nodes
    pub node_sections: Vec<BeamSection>,
    /// Section rotation per element [rad]
    pub phi: Option<Vec<f64>>,
}

impl Discretization {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Total arclength
    pub fn length(&self) -> f64 {
        self.s_span.last().copied().unwrap_or(0.0)
    }

    /// True when every node lies on the global x axis
    pub fn is_straight_along_x(&self) -> bool {
        self.nodes.iter().all(|p| p.y == 0.0 && p.z == 0.0)
    }

    /// Sections used by the given formulation (per element or per node)
    pub fn sections_for(&self, element_type: ElementType) -> &[BeamSection] {
        if element_type.samples_at_nodes() {
            &self.node_sections
        } else {
            &self.element_sections
        }
    }
}

/// Interpolate the beam inputs onto `nel` elements (or keep the input stations).
///
/// # Errors
/// Configuration errors for missing required properties, fewer than two
/// stations, `nel == 0`, profiles of mismatched length and coincident nodes.
pub fn discretize(
    geometry: &BeamGeometry,
    props: &BeamProperties,
    nel: Option<usize>,
) -> Result<(Discretization, Material)> {
    props.validate()?;
    let material = props.material();

    // Station count: from the geometry, or from the distributed profiles
    let mut n_stations = geometry.num_stations();
    for (name, profile) in props.profiles() {
        if let Some(n) = profile.num_stations() {
            match n_stations {
                None => n_stations = Some(n),
                Some(expected) if expected != n => {
                    return Err(BeamError::config(format!(
                        "Property {} has {} values, expected {}",
                        name, n, expected
                    )));
                }
                Some(_) => {}
            }
        }
    }
    let n_stations = n_stations.unwrap_or(2);
    if n_stations < 2 {
        return Err(BeamError::config(format!(
            "At least 2 stations are needed, got {}",
            n_stations
        )));
    }

    let stations = geometry.stations(n_stations)?;
    let s0 = cumulative_arclength(&stations);
    if let Some(i) = s0.windows(2).position(|w| w[1] - w[0] <= 0.0) {
        return Err(BeamError::config(format!(
            "Stations {} and {} coincide",
            i,
            i + 1
        )));
    }

    let data = StationData::new(props, &material, n_stations);

    let (nodes, s_span) = match nel {
        Some(0) => return Err(BeamError::config("Number of elements must be at least 1")),
        Some(nel) => {
            let s = linspace(0.0, s0[n_stations - 1], nel + 1);
            let coord = |k: usize| {
                let v: Vec<f64> = stations.iter().map(|p| p[k]).collect();
                interp_many(&s, &s0, &v)
            };
            let (x, y, z) = (coord(0), coord(1), coord(2));
            let nodes = (0..=nel).map(|i| Vector3::new(x[i], y[i], z[i])).collect();
            (nodes, s)
        }
        None => (stations.clone(), s0.clone()),
    };

    let s_mid = midpoints(&s_span);
    let node_sections = data.sample(&s_span, &s0);
    let element_sections = data.sample(&s_mid, &s0);
    let phi = data.phi.as_ref().map(|p| interp_many(&s_mid, &s0, p));

    Ok((
        Discretization {
            nodes,
            s_span,
            element_sections,
            node_sections,
            phi,
        },
        material,
    ))
}
