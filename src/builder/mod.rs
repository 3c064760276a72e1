mod ec;
mod qr;

pub use qr::{Module, QR};

use tracing::{debug, info};

use crate::common::{
    codec::{encode, encode_with_version},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};
use ec::{ecc, interleave};

/// Builds a [`QR`] from raw bytes. Version and mask are picked automatically unless set.
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {}, Ec level: {:?} }}", *v, self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!(metadata = %self.metadata(), len = self.data.len(), "Building QR");

        // Encode data optimally
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, self.ec_level, v)?, v),
            None => encode(self.data, self.ec_level)?,
        };

        // Compute error correction codewords and interleave
        let (data_blocks, ecc_blocks) = ecc(encoded_data.data(), version, self.ec_level);
        let mut payload = interleave(&data_blocks);
        payload.extend(interleave(&ecc_blocks));
        debug_assert_eq!(payload.len(), version.total_codewords(), "Payload size mismatch");

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        info!(
            version = *version,
            ec_level = %self.ec_level,
            mask = *mask,
            width = qr.width(),
            "QR generated"
        );

        Ok(qr)
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{Module, QRBuilder};
    use crate::common::error::QRError;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_build_fills_grid() {
        let qr = QRBuilder::new(b"https://example.com").build().unwrap();
        assert_eq!(*qr.version(), 2);
        assert_eq!(qr.width(), 25);
        assert_eq!(qr.ec_level(), ECLevel::M);
        assert!(qr.mask().is_some());
        assert!(qr.grid().iter().all(|m| *m != Module::Empty));
        assert_eq!(qr.get(-8, 8), Module::Format(Color::Dark));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = QRBuilder::new(b"https://github.com/kaw393939").build().unwrap();
        let b = QRBuilder::new(b"https://github.com/kaw393939").build().unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.mask(), b.mask());
    }

    #[test]
    fn test_explicit_mask() {
        let mask = MaskPattern::new(5).unwrap();
        let qr = QRBuilder::new(b"HELLO WORLD").mask(mask).build().unwrap();
        assert_eq!(qr.mask(), Some(mask));
    }

    #[test]
    fn test_empty_data() {
        assert_eq!(QRBuilder::new(b"").build().err(), Some(QRError::EmptyData));
    }

    #[test]
    fn test_data_too_long() {
        let data = "a".repeat(2954);
        let res = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::L).build();
        assert_eq!(res.err(), Some(QRError::DataTooLong));

        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res.err(), Some(QRError::DataTooLong));
    }

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("https://github.com/kaw393939".to_string(), 2, ECLevel::M)]
    #[test_case("A11111111111111".repeat(11).to_string(), 7, ECLevel::M)]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3).to_string(), 7, ECLevel::Q)]
    #[test_case("1234567890".repeat(15).to_string(), 7, ECLevel::H)]
    #[test_case("A11111111111111".repeat(20).to_string(), 10, ECLevel::M)]
    #[test_case("1234567890".repeat(28).to_string(), 10, ECLevel::H)]
    #[test_case("https://example.com/".repeat(50).to_string(), 27, ECLevel::L)]
    #[test_case("A111111111111111".repeat(100).to_string(), 27, ECLevel::M)]
    #[test_case("1234567890".repeat(145).to_string(), 27, ECLevel::H)]
    #[test_case("A111111111111111".repeat(97).to_string(), 40, ECLevel::M)]
    #[test_case("1234567890".repeat(305).to_string(), 40, ECLevel::H)]
    fn test_builder(data: String, version: usize, ec_level: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes())
            .version(Version::new(version).unwrap())
            .ec_level(ec_level)
            .build()
            .unwrap();
        let img = qr.render(4, 4).unwrap();

        let mut img = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (meta, content) = grids[0].decode().unwrap();

        assert_eq!(version, meta.version.0);
        assert_eq!(data, content);
    }
}
