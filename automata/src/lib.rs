pub mod automatan;
pub mod loader;

pub use automatan::{Alphabet, Verdict, dpda::{Dpda, Run, run}};
pub use loader::InvalidAlphabet;

#[macro_export]
macro_rules! dual_enum_serde {
    (
        $( {$(#[$serde_specific:meta])*} )?
        $(#[$enum_meta:meta])*
        $vis:vis enum $Name:ident
        {
            $(
                $(#[$variant_meta:meta])*
                $Variant:ident
            ),* $(,)?
        }
    ) => {
        #[cfg(feature = "serde")]
        $(#[$enum_meta])*
        #[derive(serde::Serialize, serde::Deserialize)]
        $( $(#[$serde_specific])* )?
        $vis enum $Name {
            $(
                $(#[$variant_meta])*
                $Variant
            ),*
        }

        #[cfg(not(feature = "serde"))]
        $(#[$enum_meta])*
        $vis enum $Name {
            $(
                $Variant
            ),*
        }
    };
}
