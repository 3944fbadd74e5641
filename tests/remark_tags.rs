use school_ledger::remarks::{
    extract_tags, PaymentRemark, RemarkTag, RemarkTagger, RemarkVocabulary, TagCategory,
};

fn find(tags: &[RemarkTag], category: TagCategory) -> Vec<&str> {
    tags.iter()
        .filter(|tag| tag.category == category)
        .map(|tag| tag.value.as_str())
        .collect()
}

#[test]
fn payment_remark_yields_receipt_student_month_and_group() {
    let tags = extract_tags("إيصال دفع رقم: REC-1 - الطالب: Ali - مجموعة رياضيات - أغسطس / 2025");
    assert_eq!(find(&tags, TagCategory::ReceiptId), ["REC-1"]);
    assert_eq!(find(&tags, TagCategory::Student), ["Ali"]);
    assert_eq!(find(&tags, TagCategory::Month), ["أغسطس / 2025"]);
    assert_eq!(find(&tags, TagCategory::Group), ["رياضيات"]);
}

#[test]
fn free_text_becomes_a_single_tag() {
    let remark = "ملاحظة عشوائية بدون تنسيق";
    let tags = extract_tags(remark);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].value, remark);
}

#[test]
fn latin_free_text_is_kept_verbatim() {
    let remark = "  electricity bill - July ";
    let tags = extract_tags(remark);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].value, remark);
    assert_eq!(tags[0].category, TagCategory::Unclassified);
}

#[test]
fn empty_remark_still_yields_one_tag() {
    let tags = extract_tags("");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].value, "");
}

#[test]
fn group_and_month_in_one_fragment_are_both_tagged() {
    let tags = extract_tags("إيصال دفع رقم: 1 - الطالب: Ali - مجموعة رياضيات أغسطس / 2025");
    assert_eq!(find(&tags, TagCategory::Group), ["رياضيات"]);
    assert_eq!(find(&tags, TagCategory::Month), ["أغسطس / 2025"]);
}

#[test]
fn rendered_payments_round_trip_through_the_tagger() {
    let vocabulary = RemarkVocabulary::default();
    let remark = PaymentRemark::new("R-77", "Lina")
        .with_group("Physique")
        .with_month(9, 2025)
        .with_month(10, 2025)
        .render(&vocabulary)
        .unwrap();

    let tags = RemarkTagger::new(vocabulary).unwrap().extract(&remark);
    assert_eq!(find(&tags, TagCategory::ReceiptId), ["R-77"]);
    assert_eq!(find(&tags, TagCategory::Student), ["Lina"]);
    assert_eq!(find(&tags, TagCategory::Group), ["Physique"]);
    assert_eq!(find(&tags, TagCategory::Month), ["سبتمبر / 2025", "أكتوبر / 2025"]);
}

#[test]
fn tags_render_as_label_and_value() {
    let tags = extract_tags("إيصال دفع رقم: 12 - الطالب: Sami");
    let rendered: Vec<String> = tags.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["رقم الإيصال: 12", "الطالب: Sami"]);
}
