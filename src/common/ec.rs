// Galois field GF(256)
//------------------------------------------------------------------------------

// Reduction polynomial x^8 + x^4 + x^3 + x^2 + 1
const PRIMITIVE: u16 = 0x11d;

const fn exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn log_table() -> [u8; 256] {
    let exp = exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 256] = exp_table();

static LOG_TABLE: [u8; 256] = log_table();

pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}


// Reed-Solomon encoder
//------------------------------------------------------------------------------

/// Coefficients of (x - a^0)(x - a^1)..(x - a^(degree - 1)), highest power first.
pub fn generator_polynomial(degree: usize) -> Vec<u8> {
    let mut poly = Vec::with_capacity(degree + 1);
    poly.push(1);
    for i in 0..degree {
        let root = EXP_TABLE[i % 255];
        poly.push(0);
        for j in (1..poly.len()).rev() {
            poly[j] ^= gf_mul(poly[j - 1], root);
        }
    }
    poly
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly[1..].iter()) {
            *u ^= gf_mul(*v, lead_coeff);
        }
    }

    res.split_off(len)
}

#[cfg(test)]
mod rs_tests {
    use super::{ecc_per_block, generator_polynomial};

    #[test]
    fn test_generator_polynomial() {
        assert_eq!(generator_polynomial(0), vec![1]);
        assert_eq!(generator_polynomial(1), vec![1, 1]);
        assert_eq!(generator_polynomial(2), vec![1, 3, 2]);
        // 10 ecc codewords, version 1-M
        assert_eq!(
            generator_polynomial(10),
            vec![1, 216, 194, 159, 111, 199, 94, 95, 113, 157, 193]
        );
    }

    #[test]
    fn test_poly_mod_1() {
        let res = ecc_per_block(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res = ecc_per_block(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13);
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let res = ecc_per_block(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18);
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_zero_block() {
        assert_eq!(ecc_per_block(&[0; 16], 10), vec![0; 10]);
    }
}
