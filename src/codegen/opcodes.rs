/// JVM opcodes emitted by the Jasmin back end
///
/// Values follow the Java Virtual Machine Specification and are ordered by
/// opcode value. Only the subset Java-- lowers to is defined.

// 0x02 - 0x08: Integer constants
pub const ICONST_M1: u8 = 0x02;
pub const ICONST_0: u8 = 0x03;
pub const ICONST_1: u8 = 0x04;
pub const ICONST_2: u8 = 0x05;
pub const ICONST_3: u8 = 0x06;
pub const ICONST_4: u8 = 0x07;
pub const ICONST_5: u8 = 0x08;

// 0x10 - 0x12: Extended constants
pub const BIPUSH: u8 = 0x10;
pub const SIPUSH: u8 = 0x11;
pub const LDC: u8 = 0x12;

// 0x15 - 0x2D: Loads
pub const ILOAD: u8 = 0x15;
pub const ALOAD: u8 = 0x19;
pub const ILOAD_0: u8 = 0x1a;
pub const ILOAD_1: u8 = 0x1b;
pub const ILOAD_2: u8 = 0x1c;
pub const ILOAD_3: u8 = 0x1d;
pub const ALOAD_0: u8 = 0x2a;
pub const ALOAD_1: u8 = 0x2b;
pub const ALOAD_2: u8 = 0x2c;
pub const ALOAD_3: u8 = 0x2d;

// 0x2E - 0x33: Array loads
pub const IALOAD: u8 = 0x2e;
pub const AALOAD: u8 = 0x32;
pub const BALOAD: u8 = 0x33;

// 0x36 - 0x4E: Stores
pub const ISTORE: u8 = 0x36;
pub const ASTORE: u8 = 0x3a;
pub const ISTORE_0: u8 = 0x3b;
pub const ISTORE_1: u8 = 0x3c;
pub const ISTORE_2: u8 = 0x3d;
pub const ISTORE_3: u8 = 0x3e;
pub const ASTORE_0: u8 = 0x4b;
pub const ASTORE_1: u8 = 0x4c;
pub const ASTORE_2: u8 = 0x4d;
pub const ASTORE_3: u8 = 0x4e;

// 0x4F - 0x54: Array stores
pub const IASTORE: u8 = 0x4f;
pub const AASTORE: u8 = 0x53;
pub const BASTORE: u8 = 0x54;

// 0x57: Stack
pub const POP: u8 = 0x57;

// 0x60 - 0x82: Arithmetic and logic
pub const IADD: u8 = 0x60;
pub const ISUB: u8 = 0x64;
pub const IMUL: u8 = 0x68;
pub const IDIV: u8 = 0x6c;
pub const IAND: u8 = 0x7e;
pub const IOR: u8 = 0x80;
pub const IXOR: u8 = 0x82;

// 0x99 - 0xA7: Branches
pub const IFNE: u8 = 0x9a;
pub const IF_ICMPLT: u8 = 0xa1;
pub const IF_ICMPGE: u8 = 0xa2;
pub const IF_ICMPGT: u8 = 0xa3;
pub const IF_ICMPLE: u8 = 0xa4;
pub const GOTO: u8 = 0xa7;

// 0xAC - 0xB1: Returns
pub const IRETURN: u8 = 0xac;
pub const ARETURN: u8 = 0xb0;
pub const RETURN: u8 = 0xb1;

// 0xB4 - 0xBE: Fields, invocation, objects
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const NEW: u8 = 0xbb;
pub const NEWARRAY: u8 = 0xbc;
pub const ANEWARRAY: u8 = 0xbd;
pub const ARRAYLENGTH: u8 = 0xbe;

/// Jasmin mnemonic of `op`
pub fn mnemonic(op: u8) -> &'static str {
    match op {
        ICONST_M1 => "iconst_m1",
        ICONST_0 => "iconst_0",
        ICONST_1 => "iconst_1",
        ICONST_2 => "iconst_2",
        ICONST_3 => "iconst_3",
        ICONST_4 => "iconst_4",
        ICONST_5 => "iconst_5",
        BIPUSH => "bipush",
        SIPUSH => "sipush",
        LDC => "ldc",
        ILOAD => "iload",
        ALOAD => "aload",
        ILOAD_0 => "iload_0",
        ILOAD_1 => "iload_1",
        ILOAD_2 => "iload_2",
        ILOAD_3 => "iload_3",
        ALOAD_0 => "aload_0",
        ALOAD_1 => "aload_1",
        ALOAD_2 => "aload_2",
        ALOAD_3 => "aload_3",
        IALOAD => "iaload",
        AALOAD => "aaload",
        BALOAD => "baload",
        ISTORE => "istore",
        ASTORE => "astore",
        ISTORE_0 => "istore_0",
        ISTORE_1 => "istore_1",
        ISTORE_2 => "istore_2",
        ISTORE_3 => "istore_3",
        ASTORE_0 => "astore_0",
        ASTORE_1 => "astore_1",
        ASTORE_2 => "astore_2",
        ASTORE_3 => "astore_3",
        IASTORE => "iastore",
        AASTORE => "aastore",
        BASTORE => "bastore",
        POP => "pop",
        IADD => "iadd",
        ISUB => "isub",
        IMUL => "imul",
        IDIV => "idiv",
        IAND => "iand",
        IOR => "ior",
        IXOR => "ixor",
        IFNE => "ifne",
        IF_ICMPLT => "if_icmplt",
        IF_ICMPGE => "if_icmpge",
        IF_ICMPGT => "if_icmpgt",
        IF_ICMPLE => "if_icmple",
        GOTO => "goto",
        IRETURN => "ireturn",
        ARETURN => "areturn",
        RETURN => "return",
        GETFIELD => "getfield",
        PUTFIELD => "putfield",
        INVOKEVIRTUAL => "invokevirtual",
        INVOKESPECIAL => "invokespecial",
        INVOKESTATIC => "invokestatic",
        NEW => "new",
        NEWARRAY => "newarray",
        ANEWARRAY => "anewarray",
        ARRAYLENGTH => "arraylength",
        _ => "<unknown>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_forms_are_contiguous() {
        assert_eq!(ILOAD_0 + 3, ILOAD_3);
        assert_eq!(ALOAD_0 + 3, ALOAD_3);
        assert_eq!(ISTORE_0 + 3, ISTORE_3);
        assert_eq!(ASTORE_0 + 3, ASTORE_3);
        assert_eq!(ICONST_0 + 5, ICONST_5);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(mnemonic(IF_ICMPLT), "if_icmplt");
        assert_eq!(mnemonic(ILOAD_0 + 2), "iload_2");
        assert_eq!(mnemonic(0xff), "<unknown>");
    }
}
