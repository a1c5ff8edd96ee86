//! Bitsliced Serpent S-boxes.
//!
//! Boolean-function forms of the eight 4-bit Serpent S-boxes after Gladman
//! and Simpson. Each function applies the S-box to 32 nibbles at once: bit
//! `j` of the four input words forms the `j`-th 4-bit input, and bit `j` of
//! the four output words forms the `j`-th output.

/// Apply S-box `index % 8` to the bitsliced words `[a, b, c, d]`.
pub(crate) fn apply(index: usize, [a, b, c, d]: [u32; 4]) -> [u32; 4] {
    match index % 8 {
        0 => sb0(a, b, c, d),
        1 => sb1(a, b, c, d),
        2 => sb2(a, b, c, d),
        3 => sb3(a, b, c, d),
        4 => sb4(a, b, c, d),
        5 => sb5(a, b, c, d),
        6 => sb6(a, b, c, d),
        _ => sb7(a, b, c, d),
    }
}

fn sb0(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = a ^ d;
    let t2 = a & d;
    let t3 = c ^ t1;
    let t4 = b ^ t3;
    let h = t2 ^ t4;
    let t6 = b & t1;
    let t7 = a ^ t6;
    let t8 = c | t7;
    let g = t4 ^ t8;
    let t10 = !t3;
    let t11 = t3 ^ t7;
    let t12 = h & t11;
    let f = t10 ^ t12;
    let t14 = !t7;
    let e = t12 ^ t14;
    [e, f, g, h]
}

fn sb1(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = !a;
    let t2 = b ^ t1;
    let t3 = a | t2;
    let t4 = d | t2;
    let t5 = c ^ t3;
    let g = d ^ t5;
    let t7 = b ^ t4;
    let t8 = t2 ^ g;
    let t9 = t5 & t7;
    let h = t8 ^ t9;
    let t11 = t5 ^ t7;
    let f = h ^ t11;
    let t13 = t8 & t11;
    let e = t5 ^ t13;
    [e, f, g, h]
}

pub(crate) fn sb2(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = !a;
    let t2 = b ^ d;
    let t3 = c & t1;
    let e = t2 ^ t3;
    let t5 = c ^ t1;
    let t6 = c ^ e;
    let t7 = b & t6;
    let h = t5 ^ t7;
    let t9 = d | t7;
    let t10 = e | t5;
    let t11 = t9 & t10;
    let g = a ^ t11;
    let t13 = d | t1;
    let t14 = t2 ^ h;
    let t15 = g ^ t13;
    let f = t14 ^ t15;
    [e, f, g, h]
}

fn sb3(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = a ^ b;
    let t2 = a & c;
    let t3 = a | d;
    let t4 = c ^ d;
    let t5 = t1 & t3;
    let t6 = t2 | t5;
    let g = t4 ^ t6;
    let t8 = b ^ t3;
    let t9 = t6 ^ t8;
    let t10 = t4 & t9;
    let e = t1 ^ t10;
    let t12 = g & e;
    let f = t9 ^ t12;
    let t14 = b | d;
    let t15 = t4 ^ t12;
    let h = t14 ^ t15;
    [e, f, g, h]
}

fn sb4(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = a ^ d;
    let t2 = d & t1;
    let t3 = c ^ t2;
    let t4 = b | t3;
    let h = t1 ^ t4;
    let t6 = !b;
    let t7 = t1 | t6;
    let e = t3 ^ t7;
    let t9 = a & e;
    let t10 = t1 ^ t6;
    let t11 = t4 & t10;
    let g = t9 ^ t11;
    let t13 = a ^ t3;
    let t14 = t10 & g;
    let f = t13 ^ t14;
    [e, f, g, h]
}

fn sb5(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = !a;
    let t2 = a ^ b;
    let t3 = a ^ d;
    let t4 = c ^ t1;
    let t5 = t2 | t3;
    let e = t4 ^ t5;
    let t7 = d & e;
    let t8 = t2 ^ e;
    let f = t7 ^ t8;
    let t10 = t1 | e;
    let t11 = t2 | t7;
    let t12 = t3 ^ t10;
    let g = t11 ^ t12;
    let t14 = b ^ t7;
    let t15 = f & t12;
    let h = t14 ^ t15;
    [e, f, g, h]
}

fn sb6(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = !a;
    let t2 = a ^ d;
    let t3 = b ^ t2;
    let t4 = t1 | t2;
    let t5 = c ^ t4;
    let f = b ^ t5;
    let t7 = t2 | f;
    let t8 = d ^ t7;
    let t9 = t5 & t8;
    let g = t3 ^ t9;
    let t11 = t5 ^ t8;
    let e = g ^ t11;
    let t13 = !t5;
    let t14 = t3 & t11;
    let h = t13 ^ t14;
    [e, f, g, h]
}

fn sb7(a: u32, b: u32, c: u32, d: u32) -> [u32; 4] {
    let t1 = b ^ c;
    let t2 = c & t1;
    let t3 = d ^ t2;
    let t4 = a ^ t3;
    let t5 = d | t1;
    let t6 = t4 & t5;
    let f = b ^ t6;
    let t8 = t3 | f;
    let t9 = a & t4;
    let h = t1 ^ t9;
    let t11 = t4 ^ t8;
    let t12 = h & t11;
    let g = t3 ^ t12;
    let t14 = !t11;
    let t15 = h & g;
    let e = t14 ^ t15;
    [e, f, g, h]
}
