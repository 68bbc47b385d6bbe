//! Rotation merging: combine
//! commuting-equal Pauli rotations, and fold Clifford-angle rotations into
//! a leading Clifford block.

use crate::pauli::{CliffordOperatorType, PauliConjugate, PauliRotation};
use crate::phase::Phase;
use crate::tableau::StabilizerTableau;

/// Merge pairwise-commuting-up-through-j rotations with equal Pauli
/// products: `θ_i += θ_j`, drop `θ_j`, drop anything that lands on zero.
pub fn merge_rotations(rotations: &[PauliRotation]) -> Vec<PauliRotation> {
    let mut rs: Vec<Option<PauliRotation>> = rotations.iter().cloned().map(Some).collect();

    for i in 0..rs.len() {
        let Some(ri) = rs[i].clone() else { continue };
        for j in (i + 1)..rs.len() {
            let Some(rj) = rs[j].clone() else { continue };

            let commutes_through = (i + 1..j).all(|k| match &rs[k] {
                Some(rk) => rk.pauli_product().is_commutative(rj.pauli_product()),
                None => true,
            });
            if !commutes_through {
                break;
            }

            if ri.pauli_product() == rj.pauli_product() {
                let merged = PauliRotation::new(ri.pauli_product().clone(), ri.phase().add(&rj.phase()));
                rs[i] = Some(merged.clone());
                rs[j] = None;
                if merged.phase().is_zero() {
                    rs[i] = None;
                }
                break;
            }
        }
    }

    rs.into_iter().flatten().filter(|r| !r.phase().is_zero()).collect()
}

/// Is `phase` one of the Clifford angles (`±π/2`, `π`)?
fn is_clifford_angle(phase: Phase) -> bool {
    phase == Phase::new(1, 2) || phase == Phase::new(-1, 2) || phase == Phase::pi()
}

/// Extended merge: after the Pauli-only pass, absorb any remaining
/// Clifford-angle rotation into `clifford` by basis-changing it to a
/// Z-rotation (conjugation), applying the equivalent S/Sdg/Z, then undoing
/// the basis change.
pub fn merge_rotations_into_clifford(
    clifford: &mut StabilizerTableau,
    rotations: &[PauliRotation],
) -> Vec<PauliRotation> {
    let merged = merge_rotations(rotations);
    let mut remaining = Vec::new();

    for r in merged {
        if !is_clifford_angle(r.phase()) {
            remaining.push(r);
            continue;
        }

        let (ops, target) = crate::pauli::rotation_clifford_ops(&r);
        clifford.apply_ops(&ops);

        if r.phase() == Phase::new(1, 2) {
            clifford.s(target);
        } else if r.phase() == Phase::new(-1, 2) {
            clifford.apply_op(&crate::pauli::CliffordOperator::single(CliffordOperatorType::Sdg, target));
        } else {
            clifford.z(target);
        }

        let undo = crate::pauli::adjoint_ops(&ops);
        clifford.apply_ops(&undo);
    }

    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliProduct;

    fn rot(s: &str, phase: Phase) -> PauliRotation {
        PauliRotation::new(PauliProduct::from_string(s).unwrap(), phase)
    }

    #[test]
    fn equal_products_merge_into_summed_phase() {
        let rs = vec![rot("Z", Phase::new(1, 4)), rot("Z", Phase::new(1, 4))];
        let merged = merge_rotations(&rs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].phase(), Phase::new(1, 2));
    }

    #[test]
    fn opposite_phases_cancel_to_nothing() {
        let rs = vec![rot("X", Phase::new(1, 4)), rot("X", Phase::new(-1, 4))];
        assert!(merge_rotations(&rs).is_empty());
    }

    #[test]
    fn non_commuting_intermediate_blocks_the_merge() {
        let rs = vec![rot("Z", Phase::new(1, 4)), rot("X", Phase::new(1, 4)), rot("Z", Phase::new(1, 4))];
        let merged = merge_rotations(&rs);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn clifford_angle_rotation_is_absorbed() {
        let mut c = StabilizerTableau::identity(1);
        let remaining = merge_rotations_into_clifford(&mut c, &[rot("Z", Phase::pi())]);
        assert!(remaining.is_empty());
        assert_ne!(c, StabilizerTableau::identity(1));
    }
}
