//! Enumerations shared with the native library.
//!
//! Numeric values are zint's own constants and serialize as numbers, so a
//! configuration written for the C API reads the same here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::path::Path;

macro_rules! numeric_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value as u32
            }
        }

        impl TryFrom<u32> for $name {
            type Error = String;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(format!("unknown {} value {other}", stringify!($name))),
                }
            }
        }
    };
}

numeric_enum! {
    /// Barcode symbology (`BARCODE_*`).
    SymbologyType {
        /// Code 11
        Code11 = 1,
        /// Standard Code 2 of 5 (Matrix)
        C25Standard = 2,
        /// Interleaved 2 of 5
        C25Inter = 3,
        /// Code 2 of 5 IATA
        C25Iata = 4,
        /// Code 2 of 5 Data Logic
        C25Logic = 6,
        /// Code 2 of 5 Industrial
        C25Ind = 7,
        /// Code 39
        Code39 = 8,
        /// Extended Code 39
        ExCode39 = 9,
        /// EAN-13 / EAN-8
        Ean = 13,
        /// EAN with check digit
        EanChk = 14,
        /// GS1-128
        Gs1128 = 16,
        /// Codabar
        Codabar = 18,
        /// Code 128
        Code128 = 20,
        /// Deutsche Post Leitcode
        DpLeit = 21,
        /// Deutsche Post Identcode
        DpIdent = 22,
        /// Code 16K
        Code16k = 23,
        /// Code 49
        Code49 = 24,
        /// Code 93
        Code93 = 25,
        /// Flattermarken
        Flat = 28,
        /// GS1 DataBar Omnidirectional
        DbarOmn = 29,
        /// GS1 DataBar Limited
        DbarLtd = 30,
        /// GS1 DataBar Expanded
        DbarExp = 31,
        /// Telepen Alpha
        Telepen = 32,
        /// UPC-A
        UpcA = 34,
        /// UPC-A with check digit
        UpcAChk = 35,
        /// UPC-E
        UpcE = 37,
        /// UPC-E with check digit
        UpcEChk = 38,
        /// USPS POSTNET
        Postnet = 40,
        /// MSI Plessey
        MsiPlessey = 47,
        /// Facing Identification Mark
        Fim = 49,
        /// LOGMARS
        Logmars = 50,
        /// Pharmacode One-Track
        Pharma = 51,
        /// Pharmazentralnummer
        Pzn = 52,
        /// Pharmacode Two-Track
        PharmaTwo = 53,
        /// Brazilian CEPNet
        Cepnet = 54,
        /// PDF417
        Pdf417 = 55,
        /// Compact PDF417
        Pdf417Comp = 56,
        /// MaxiCode
        MaxiCode = 57,
        /// QR Code
        Qr = 58,
        /// Code 128 (subset B)
        Code128B = 60,
        /// Australia Post Standard Customer
        AusPost = 63,
        /// Australia Post Reply Paid
        AusReply = 66,
        /// Australia Post Routing
        AusRoute = 67,
        /// Australia Post Redirection
        AusRedirect = 68,
        /// ISBN
        Isbnx = 69,
        /// Royal Mail 4-State
        Rm4scc = 70,
        /// Data Matrix (ECC 200)
        DataMatrix = 71,
        /// EAN-14
        Ean14 = 72,
        /// Vehicle Identification Number
        Vin = 73,
        /// Codablock-F
        CodablockF = 74,
        /// NVE-18 (SSCC-18)
        Nve18 = 75,
        /// Japanese Postal Code
        JapanPost = 76,
        /// Korea Post
        KoreaPost = 77,
        /// GS1 DataBar Stacked
        DbarStk = 79,
        /// GS1 DataBar Stacked Omnidirectional
        DbarOmnStk = 80,
        /// GS1 DataBar Expanded Stacked
        DbarExpStk = 81,
        /// USPS PLANET
        Planet = 82,
        /// MicroPDF417
        MicroPdf417 = 84,
        /// USPS Intelligent Mail
        UspsImail = 85,
        /// UK Plessey
        Plessey = 86,
        /// Telepen Numeric
        TelepenNum = 87,
        /// ITF-14
        Itf14 = 89,
        /// Dutch Post KIX
        Kix = 90,
        /// Aztec Code
        Aztec = 92,
        /// DAFT Code
        Daft = 93,
        /// DPD Code
        Dpd = 96,
        /// Micro QR Code
        MicroQr = 97,
        /// HIBC Code 128
        Hibc128 = 98,
        /// HIBC Code 39
        Hibc39 = 99,
        /// HIBC Data Matrix
        HibcDm = 102,
        /// HIBC QR Code
        HibcQr = 104,
        /// HIBC PDF417
        HibcPdf = 106,
        /// HIBC MicroPDF417
        HibcMicPdf = 108,
        /// HIBC Codablock-F
        HibcBlockF = 110,
        /// HIBC Aztec Code
        HibcAztec = 112,
        /// DotCode
        DotCode = 115,
        /// Han Xin Code
        HanXin = 116,
        /// Royal Mail 4-State Mailmark
        Mailmark = 121,
        /// Aztec Runes
        AzRune = 128,
        /// Code 32 (Italian Pharmacode)
        Code32 = 129,
        /// Composite: EAN
        EanCc = 130,
        /// Composite: GS1-128
        Gs1128Cc = 131,
        /// Composite: GS1 DataBar Omnidirectional
        DbarOmnCc = 132,
        /// Composite: GS1 DataBar Limited
        DbarLtdCc = 133,
        /// Composite: GS1 DataBar Expanded
        DbarExpCc = 134,
        /// Composite: UPC-A
        UpcACc = 135,
        /// Composite: UPC-E
        UpcECc = 136,
        /// Composite: GS1 DataBar Stacked
        DbarStkCc = 137,
        /// Composite: GS1 DataBar Stacked Omnidirectional
        DbarOmnStkCc = 138,
        /// Composite: GS1 DataBar Expanded Stacked
        DbarExpStkCc = 139,
        /// Channel Code
        Channel = 140,
        /// Code One
        CodeOne = 141,
        /// Grid Matrix
        GridMatrix = 142,
        /// UPNQR
        UpnQr = 143,
        /// Ultracode
        Ultra = 144,
        /// Rectangular Micro QR Code
        Rmqr = 145,
        /// IBM BC412 (SEMI T1-95)
        Bc412 = 146,
    }
}

numeric_enum! {
    /// Data Matrix shape hint, passed as `option3`.
    DataMatrix {
        /// Only square symbols
        Square = 100,
        /// Allow rectangular extension (DMRE) sizes
        Dmre = 101,
    }
}

numeric_enum! {
    /// Input interpretation (`input_mode`).
    EncodingMode {
        /// Raw bytes
        Data = 0,
        /// UTF-8 text
        Unicode = 1,
        /// GS1 application identifiers
        Gs1 = 2,
        /// Backslash escape sequences
        Escape = 8,
        /// GS1 data with parentheses instead of brackets around AIs
        Gs1Parens = 16,
        /// Skip GS1 AI data validation
        Gs1NoCheck = 32,
        /// Row heights given per item (stacked symbols)
        HeightPerItem = 64,
        /// Faster, less optimal encodation
        Fast = 128,
        /// Extra escape sequences (Code 128 only)
        ExtraEscape = 256,
    }
}

/// Legacy name for [`EncodingMode`].
pub type Encoding = EncodingMode;
/// Legacy name for [`OutputOption`].
pub type Output = OutputOption;
/// Legacy name for [`SymbologyType`].
pub type Barcode = SymbologyType;

/// Independent rendering switches (`output_options`), combined with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OutputOption(u32);

impl OutputOption {
    /// No options
    pub const NONE: Self = Self(0);
    /// Boundary bar above the symbol only
    pub const BIND_TOP: Self = Self(1);
    /// Boundary bars above and below the symbol
    pub const BIND: Self = Self(2);
    /// Box around the symbol
    pub const BOX: Self = Self(4);
    /// Reader initialisation flag
    pub const READER_INIT: Self = Self(16);
    /// Smaller human-readable text
    pub const SMALL_TEXT: Self = Self(32);
    /// Bold human-readable text
    pub const BOLD_TEXT: Self = Self(64);
    /// CMYK colour space (EPS)
    pub const CMYK_COLOUR: Self = Self(128);
    /// Dots instead of squares (matrix symbologies)
    pub const DOTTY_MODE: Self = Self(256);
    /// GS as GS1 separator instead of FNC1 (Data Matrix)
    pub const GS1_GS_SEPARATOR: Self = Self(512);
    /// Call the intermediate-buffer callback when bitmap output is made
    pub const OUT_BUFFER_INTERMEDIATE: Self = Self(0x400);
    /// Add the symbology's default quiet zones
    pub const QUIET_ZONES: Self = Self(0x800);
    /// Suppress quiet zones, including default ones
    pub const NO_QUIET_ZONES: Self = Self(0x1000);
    /// Restrict heights to those compliant with the symbology standard
    pub const COMPLIANT_HEIGHT: Self = Self(0x2000);

    const KNOWN: u32 = 1 | 2 | 4 | 16 | 32 | 64 | 128 | 256 | 512 | 0x400 | 0x800 | 0x1000 | 0x2000;

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OutputOption {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<OutputOption> for u32 {
    fn from(value: OutputOption) -> Self {
        value.0
    }
}

impl TryFrom<u32> for OutputOption {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let unknown = value & !Self::KNOWN;
        if unknown == 0 {
            Ok(Self(value))
        } else {
            Err(format!("unknown output option bits {unknown:#x}"))
        }
    }
}

/// Image format produced by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Base64-encoded PNG
    Png,
    /// Encapsulated PostScript text
    Eps,
    /// SVG markup
    Svg,
}

impl OutputType {
    /// Infer the format from a file extension (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zint_vendor::render::OutputType;
    /// use std::path::Path;
    ///
    /// assert_eq!(OutputType::from_path(Path::new("out/code.SVG")), Some(OutputType::Svg));
    /// assert_eq!(OutputType::from_path(Path::new("code.gif")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "eps" => Some(Self::Eps),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// File extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Eps => "eps",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
