use super::*;

#[test]
fn tag_table_matches_wire_codes() {
    let tags: Vec<i8> = ElementKind::ALL.iter().map(|kind| kind.tag()).collect();
    assert_eq!(tags, vec![0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18]);
}

#[test]
fn from_tag_inverts_tag() {
    for kind in ElementKind::ALL {
        assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(ElementKind::from_tag(0x10), None);
    assert_eq!(ElementKind::from_tag(0x19), None);
}

#[test]
fn widths_match_element_sizes() {
    assert_eq!(ElementKind::Int8.width(), 1);
    assert_eq!(ElementKind::UInt16.width(), 2);
    assert_eq!(ElementKind::Float32.width(), 4);
    assert_eq!(ElementKind::Float64.width(), 8);
}

#[test]
fn names_parse_back_to_kinds() {
    for kind in ElementKind::ALL {
        assert_eq!(kind.name().parse::<ElementKind>().expect("parse"), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
}

#[test]
fn unknown_kind_name_is_unsupported() {
    let err = "int64".parse::<ElementKind>().expect_err("int64 has no tag");
    assert!(matches!(err, CodecError::UnsupportedType(msg) if msg.contains("int64")));
}

#[test]
fn typecodes_round_trip_and_reject_64_bit_ints() {
    for kind in ElementKind::ALL {
        assert_eq!(ElementKind::from_typecode(kind.typecode()).expect("typecode"), kind);
    }
    let err = ElementKind::from_typecode('q').expect_err("q has no tag");
    assert!(matches!(err, CodecError::UnsupportedType(_)));
}

#[test]
fn le_bytes_are_tight_packed() {
    let array = TypedArray::UInt32(vec![1, 0x0102_0304]);
    assert_eq!(array.to_le_bytes(), vec![1, 0, 0, 0, 4, 3, 2, 1]);
}

#[test]
fn from_le_bytes_reads_each_kind() {
    let array = TypedArray::from_le_bytes(ElementKind::Int16, &[0xff, 0xff, 0x02, 0x00])
        .expect("aligned");
    assert_eq!(array, TypedArray::Int16(vec![-1, 2]));

    let array = TypedArray::from_le_bytes(ElementKind::Float64, &2.5_f64.to_le_bytes())
        .expect("aligned");
    assert_eq!(array, TypedArray::Float64(vec![2.5]));

    let array = TypedArray::from_le_bytes(ElementKind::UInt8, &[]).expect("empty");
    assert_eq!(array, TypedArray::empty(ElementKind::UInt8));
}

#[test]
fn from_le_bytes_rejects_partial_elements() {
    let err = TypedArray::from_le_bytes(ElementKind::Int32, &[0, 0, 0, 0, 0]).expect_err("misaligned");
    assert!(matches!(
        err,
        CodecError::MisalignedArray {
            kind: ElementKind::Int32,
            len: 5
        }
    ));
}

#[test]
fn parse_list_builds_requested_kind() {
    let array = TypedArray::parse_list(ElementKind::Float64, "1, 1, 2.5").expect("parse");
    assert_eq!(array, TypedArray::Float64(vec![1.0, 1.0, 2.5]));

    let array = TypedArray::parse_list(ElementKind::Int8, "-3,4").expect("parse");
    assert_eq!(array, TypedArray::Int8(vec![-3, 4]));

    let array = TypedArray::parse_list(ElementKind::UInt16, "").expect("parse");
    assert!(array.is_empty());
}

#[test]
fn parse_list_rejects_out_of_range_elements() {
    let err = TypedArray::parse_list(ElementKind::UInt8, "1,256").expect_err("256 overflows u8");
    assert!(matches!(err, CodecError::UnsupportedType(_)));
}

#[test]
fn vec_conversions_pick_matching_kind() {
    assert_eq!(TypedArray::from(vec![1.0_f32]).kind(), ElementKind::Float32);
    assert_eq!(TypedArray::from(vec![1_u16]).kind(), ElementKind::UInt16);
    assert_eq!(TypedArray::from(vec![1_i8, 2]).len(), 2);
}
