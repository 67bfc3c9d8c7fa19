/* Contracted Gaussian type orbitals (CGTO) built on top of gto.rs,
   plus per-atom collections parsed from NWChem-format basis text.
*/
#![allow(non_snake_case)]

use crate::basis::{AOBasis, Basis, BasisError};
use crate::gto::GTO;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
    // shell_type: 1s, 2s, 2px, 2py, 2pz, ...
    pub shell_type: String,
}

impl ContractedGTO {
    /// Build a contraction and rescale its coefficients so that <φ|φ> = 1.
    pub fn new(primitives: Vec<GTO>, coefficients: Vec<f64>, shell_type: &str) -> Self {
        let mut cgto = ContractedGTO {
            primitives,
            coefficients,
            shell_type: shell_type.to_string(),
        };
        let self_overlap = ContractedGTO::Sab(&cgto, &cgto);
        if self_overlap > 0.0 {
            let scale = 1.0 / self_overlap.sqrt();
            cgto.coefficients.iter_mut().for_each(|c| *c *= scale);
        }
        cgto
    }

    pub fn center(&self) -> Vector3<f64> {
        self.primitives
            .first()
            .map(|p| p.center)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn recentered(&self, center: Vector3<f64>) -> Self {
        ContractedGTO {
            primitives: self.primitives.iter().map(|p| p.recentered(center)).collect(),
            coefficients: self.coefficients.clone(),
            shell_type: self.shell_type.clone(),
        }
    }

    // Σ_ij c_i c_j op(p_i, p_j)
    fn contract<F>(a: &Self, b: &Self, op: F) -> f64
    where
        F: Fn(&GTO, &GTO) -> f64,
    {
        let mut val = 0.0;
        for (pa, ca) in a.primitives.iter().zip(&a.coefficients) {
            for (pb, cb) in b.primitives.iter().zip(&b.coefficients) {
                val += ca * cb * op(pa, pb);
            }
        }
        val
    }
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.primitives
            .iter()
            .zip(&self.coefficients)
            .map(|(p, c)| c * p.evaluate(r))
            .sum()
    }

    fn Sab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::contract(a, b, GTO::Sab)
    }

    fn Tab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::contract(a, b, GTO::Tab)
    }

    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64 {
        ContractedGTO::contract(a, b, |pa, pb| GTO::Vab(pa, pb, R, Z))
    }

    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64 {
        let mut val = 0.0;
        for (pa, ca) in a.primitives.iter().zip(&a.coefficients) {
            for (pb, cb) in b.primitives.iter().zip(&b.coefficients) {
                let cab = ca * cb;
                for (pc, cc) in c.primitives.iter().zip(&c.coefficients) {
                    for (pd, cd) in d.primitives.iter().zip(&d.coefficients) {
                        val += cab * cc * cd * GTO::JKabcd(pa, pb, pc, pd);
                    }
                }
            }
        }
        val
    }
}

/// All contracted functions of one element in one basis set.
#[derive(Debug, Clone)]
pub struct AtomBasis {
    pub name: String,
    pub symbol: String,
    pub atomic_number: u32,
    pub center: Vector3<f64>,
    pub basis_set: Vec<Arc<ContractedGTO>>,
}

impl AOBasis for AtomBasis {
    type BasisType = ContractedGTO;

    fn basis_size(&self) -> usize {
        self.basis_set.len()
    }

    fn get_basis(&self) -> Vec<Arc<ContractedGTO>> {
        self.basis_set.clone()
    }

    fn set_center(&mut self, center: Vector3<f64>) {
        self.center = center;
        self.basis_set = self
            .basis_set
            .iter()
            .map(|cgto| Arc::new(cgto.recentered(center)))
            .collect();
    }

    fn get_center(&self) -> Option<Vector3<f64>> {
        Some(self.center)
    }
}

const P_COMPONENTS: [(&str, [i32; 3]); 3] = [("px", [1, 0, 0]), ("py", [0, 1, 0]), ("pz", [0, 0, 1])];

impl AtomBasis {
    // Example of nwchem format:
    // BASIS "ao basis" PRINT
    // #BASIS SET: (6s,3p) -> [2s,1p]
    // C    S
    //       71.6168370              0.15432897
    //       13.0450960              0.53532814
    //        3.5305122              0.44463454
    // C    SP
    //        2.9412494             -0.09996723             0.15591627
    //        0.6834831              0.39951283             0.60768372
    //        0.2222899              0.70011547             0.39195739
    // END

    /// Parse NWChem-format text into one `AtomBasis` per element, in order of appearance.
    pub fn parse_nwchem(name: &str, input: &str) -> Result<Vec<AtomBasis>, BasisError> {
        let mut atoms: Vec<AtomBasis> = Vec::new();
        let mut block: Vec<[f64; 3]> = Vec::new();
        let mut header: Option<(String, String)> = None;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("BASIS") {
                continue;
            }
            if line.eq_ignore_ascii_case("END") {
                break;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let is_header = tokens[0].chars().all(char::is_alphabetic);
            if is_header {
                if tokens.len() != 2 {
                    return Err(BasisError::MalformedLine(line.to_string()));
                }
                if let Some((symbol, shell)) = header.take() {
                    AtomBasis::push_block(name, &mut atoms, &symbol, &shell, &block)?;
                }
                block.clear();
                header = Some((tokens[0].to_string(), tokens[1].to_uppercase()));
                continue;
            }

            let numbers = tokens
                .iter()
                .map(|t| t.replace(['D', 'd'], "E").parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| BasisError::MalformedLine(line.to_string()))?;
            if numbers.len() < 2 || numbers.len() > 3 {
                return Err(BasisError::MalformedLine(line.to_string()));
            }
            block.push([numbers[0], numbers[1], *numbers.get(2).unwrap_or(&0.0)]);
        }

        if let Some((symbol, shell)) = header.take() {
            AtomBasis::push_block(name, &mut atoms, &symbol, &shell, &block)?;
        }

        Ok(atoms)
    }

    fn push_block(
        name: &str,
        atoms: &mut Vec<AtomBasis>,
        symbol: &str,
        shell: &str,
        block: &[[f64; 3]],
    ) -> Result<(), BasisError> {
        let idx = match atoms.iter().position(|a| a.symbol.eq_ignore_ascii_case(symbol)) {
            Some(idx) => idx,
            None => {
                let element = Element::from_symbol(symbol)
                    .ok_or_else(|| BasisError::UnknownElement(symbol.to_string()))?;
                atoms.push(AtomBasis {
                    name: name.to_string(),
                    symbol: element.get_symbol().to_string(),
                    atomic_number: element.get_atomic_number() as u32,
                    center: Vector3::zeros(),
                    basis_set: Vec::new(),
                });
                atoms.len() - 1
            }
        };

        let atom = &mut atoms[idx];
        let n = atom
            .basis_set
            .iter()
            .filter(|c| c.shell_type.ends_with('s'))
            .count()
            + 1;
        let center = atom.center;
        let exponents: Vec<f64> = block.iter().map(|row| row[0]).collect();

        let s_shell = |coeff_col: usize| {
            let prims = exponents
                .iter()
                .map(|&alpha| GTO::new(alpha, Vector3::new(0, 0, 0), center))
                .collect();
            let coeffs = block.iter().map(|row| row[coeff_col]).collect();
            Arc::new(ContractedGTO::new(prims, coeffs, &format!("{}s", n)))
        };
        let p_shells = |coeff_col: usize, n: usize| {
            P_COMPONENTS
                .iter()
                .map(|(label, l)| {
                    let prims = exponents
                        .iter()
                        .map(|&alpha| GTO::new(alpha, Vector3::new(l[0], l[1], l[2]), center))
                        .collect();
                    let coeffs = block.iter().map(|row| row[coeff_col]).collect();
                    Arc::new(ContractedGTO::new(prims, coeffs, &format!("{}{}", n, label)))
                })
                .collect::<Vec<_>>()
        };

        match shell {
            "S" => atom.basis_set.push(s_shell(1)),
            "SP" => {
                atom.basis_set.push(s_shell(1));
                atom.basis_set.extend(p_shells(2, n));
            }
            "P" => atom.basis_set.extend(p_shells(1, n.max(2))),
            other => return Err(BasisError::UnsupportedShell(other.to_string())),
        }
        Ok(())
    }
}
