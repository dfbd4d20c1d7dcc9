/// Element factory for creating frame elements from a discretized beam
///
/// The element type selects how the sampled sections are used: one section per
/// element for `Frame3d`, one per node for `Frame3dLin`.

use crate::elements::{BeamSection, ElementMatrices, Frame3d, Frame3dLin, FrameElement, Material};
use crate::error::{BeamError, Result};
use crate::types::ElementType;

/// Dynamic element wrapper that can hold any frame element formulation
///
/// This allows the assembler to loop over elements without knowing the concrete
/// formulation at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicFrame {
    Frame3d(Frame3d),
    Frame3dLin(Frame3dLin),
}

impl DynamicFrame {
    /// Create element `iel` of the given formulation
    ///
    /// # Arguments
    /// * `element_type` - Formulation
    /// * `iel` - Element index along the beam
    /// * `length` - Element length
    /// * `material` - Beam material
    /// * `sections` - Per-element sections (`Frame3d`) or per-node sections (`Frame3dLin`)
    pub fn from_sections(
        element_type: ElementType,
        iel: usize,
        length: f64,
        material: Material,
        sections: &[BeamSection],
    ) -> Result<Self> {
        let missing = || {
            BeamError::dimension(format!(
                "No section data for element {} ({} sections given)",
                iel,
                sections.len()
            ))
        };
        match element_type {
            ElementType::Frame3d => {
                let section = sections.get(iel).ok_or_else(missing)?;
                Ok(DynamicFrame::Frame3d(Frame3d::new(length, material, *section)))
            }
            ElementType::Frame3dLin => {
                let start = sections.get(iel).ok_or_else(missing)?;
                let end = sections.get(iel + 1).ok_or_else(missing)?;
                Ok(DynamicFrame::Frame3dLin(Frame3dLin::new(
                    length, material, *start, *end,
                )))
            }
        }
    }
}

impl FrameElement for DynamicFrame {
    fn element_type(&self) -> ElementType {
        match self {
            DynamicFrame::Frame3d(e) => e.element_type(),
            DynamicFrame::Frame3dLin(e) => e.element_type(),
        }
    }

    fn length(&self) -> f64 {
        match self {
            DynamicFrame::Frame3d(e) => e.length(),
            DynamicFrame::Frame3dLin(e) => e.length(),
        }
    }

    fn matrices(&self) -> ElementMatrices {
        match self {
            DynamicFrame::Frame3d(e) => e.matrices(),
            DynamicFrame::Frame3dLin(e) => e.matrices(),
        }
    }

    fn total_mass(&self) -> f64 {
        match self {
            DynamicFrame::Frame3d(e) => e.total_mass(),
            DynamicFrame::Frame3dLin(e) => e.total_mass(),
        }
    }
}
