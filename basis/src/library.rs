//! Built-in basis set data.

use crate::basis::BasisError;
use crate::cgto::AtomBasis;
use std::collections::HashMap;
use std::sync::OnceLock;

const STO3G_NWCHEM: &str = "
BASIS \"ao basis\" PRINT
#BASIS SET: (3s) -> [1s]
H    S
      3.42525091             0.15432897
      0.62391373             0.53532814
      0.16885540             0.44463454
#BASIS SET: (3s) -> [1s]
He    S
      6.36242139             0.15432897
      1.15892300             0.53532814
      0.31364979             0.44463454
#BASIS SET: (6s,3p) -> [2s,1p]
Li    S
     16.1195750              0.15432897
      2.9362007              0.53532814
      0.7946505              0.44463454
Li    SP
      0.6362897             -0.09996723             0.15591627
      0.1478601              0.39951283             0.60768372
      0.0480887              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
Be    S
     30.1678710              0.15432897
      5.4951153              0.53532814
      1.4871927              0.44463454
Be    SP
      1.3148331             -0.09996723             0.15591627
      0.3055389              0.39951283             0.60768372
      0.0993707              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
B    S
     48.7911130              0.15432897
      8.8873622              0.53532814
      2.4052670              0.44463454
B    SP
      2.2369561             -0.09996723             0.15591627
      0.5198205              0.39951283             0.60768372
      0.1690618              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
C    S
     71.6168370              0.15432897
     13.0450960              0.53532814
      3.5305122              0.44463454
C    SP
      2.9412494             -0.09996723             0.15591627
      0.6834831              0.39951283             0.60768372
      0.2222899              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
N    S
     99.1061690              0.15432897
     18.0523120              0.53532814
      4.8856602              0.44463454
N    SP
      3.7804559             -0.09996723             0.15591627
      0.8784966              0.39951283             0.60768372
      0.2857144              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
O    S
    130.7093200              0.15432897
     23.8088610              0.53532814
      6.4436083              0.44463454
O    SP
      5.0331513             -0.09996723             0.15591627
      1.1695961              0.39951283             0.60768372
      0.3803890              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
F    S
    166.6791300              0.15432897
     30.3608120              0.53532814
      8.2168207              0.44463454
F    SP
      6.4648032             -0.09996723             0.15591627
      1.5022812              0.39951283             0.60768372
      0.4885885              0.70011547             0.39195739
#BASIS SET: (6s,3p) -> [2s,1p]
Ne    S
    207.0156100              0.15432897
     37.7081510              0.53532814
     10.2052970              0.44463454
Ne    SP
      8.2463151             -0.09996723             0.15591627
      1.9162662              0.39951283             0.60768372
      0.6232293              0.70011547             0.39195739
END
";

static STO3G: OnceLock<HashMap<String, AtomBasis>> = OnceLock::new();

fn sto3g() -> &'static HashMap<String, AtomBasis> {
    STO3G.get_or_init(|| {
        AtomBasis::parse_nwchem("sto-3g", STO3G_NWCHEM)
            .map(|atoms| atoms.into_iter().map(|a| (a.symbol.clone(), a)).collect())
            .unwrap_or_default()
    })
}

/// Look up the basis of one element in a named built-in basis set.
///
/// The returned basis is centred at the origin; callers move it with
/// `AOBasis::set_center`.
pub fn atom_basis(basis_name: &str, symbol: &str) -> Result<AtomBasis, BasisError> {
    let table = match basis_name.to_lowercase().replace('-', "").as_str() {
        "sto3g" => sto3g(),
        _ => return Err(BasisError::UnsupportedBasis(basis_name.to_string())),
    };
    table
        .get(symbol)
        .cloned()
        .ok_or_else(|| BasisError::MissingElement {
            name: basis_name.to_string(),
            element: symbol.to_string(),
        })
}
