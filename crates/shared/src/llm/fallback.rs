//! Deterministic, network-free replies for when every inference variant has
//! failed. First matching rule wins; rule order is part of the behavior.

struct FallbackRule {
    keywords: &'static [&'static str],
    response: &'static str,
}

const RULES: &[FallbackRule] = &[
    FallbackRule {
        keywords: &["capek", "lelah", "pegal", "recovery", "istirahat"],
        response: "Kelelahan setelah olahraga itu normal! 💪 Beberapa tips recovery:\n\n1. **Tidur 7-8 jam** per malam untuk pemulihan otot\n2. **Minum air putih** minimal 2-3 liter/hari\n3. **Konsumsi protein** (telur, ayam, ikan) dalam 30 menit setelah olahraga\n4. **Stretching ringan** sebelum tidur\n\nJika kelelahan berlanjut lebih dari 2-3 hari, pertimbangkan untuk menurunkan intensitas latihan.",
    },
    FallbackRule {
        keywords: &["menu", "makan", "makanan", "sarapan", "makan siang", "makan malam", "resep"],
        response: "Berikut contoh menu sehat sehari! 🥗\n\n**Sarapan (±400 cal):** Oatmeal + pisang + madu + kacang almond\n**Snack pagi:** Buah apel + yoghurt\n**Makan siang (±500 cal):** Nasi merah + ayam panggang + tumis brokoli\n**Snack sore:** Smoothie buah atau protein bar\n**Makan malam (±400 cal):** Ikan salmon + sayur bayam + kentang rebus\n\nTotal: ±1,500-1,800 cal. Sesuaikan porsi dengan kebutuhan kalori harian Anda!",
    },
    FallbackRule {
        keywords: &["nafsu", "lapar", "ngemil", "craving", "ngidam"],
        response: "Tips mengendalikan nafsu makan berlebih: 🧠\n\n1. **Minum air putih** 1 gelas sebelum makan — ini mengurangi porsi hingga 20%\n2. **Makan berserat tinggi** (sayur, buah, oat) agar kenyang lebih lama\n3. **Hindari makanan ultra-processed** — ganti snack crackers dengan kacang rebus\n4. **Atur jadwal makan teratur** setiap 3-4 jam\n5. **Tidur cukup** — kurang tidur meningkatkan hormon lapar (ghrelin)\n\nKalau masih craving, coba makan buah yang manis seperti mangga atau semangka! 🍉",
    },
    FallbackRule {
        keywords: &["berat badan", "turun", "diet", "kurus", "langsing", "gemuk", "berat"],
        response: "Untuk menurunkan berat badan secara sehat: ⚖️\n\n1. **Target deficit 500 cal/hari** = turun ±0.5kg per minggu\n2. **Hitung TDEE** (Total Daily Energy Expenditure) Anda dulu\n3. **Prioritaskan protein** — 1.6-2.2g per kg berat badan\n4. **Olahraga 3-4x/minggu** — kombinasi cardio + angkat beban\n5. **Jangan skip makan** — lebih baik porsi kecil tapi sering\n\n⚠️ Jangan diet ekstrem (< 1,200 cal/hari) karena bisa memperlambat metabolisme. Konsistensi > kecepatan!",
    },
    FallbackRule {
        keywords: &["olahraga", "latihan", "gym", "fitness", "lari", "jogging", "cardio"],
        response: "Rekomendasi program olahraga mingguan: 🏋️\n\n**Senin:** Upper body (push-up, dumbbell press, shoulder press)\n**Selasa:** Cardio 30 menit (jogging/cycling)\n**Rabu:** Lower body (squat, lunges, deadlift)\n**Kamis:** Rest / stretching / yoga\n**Jumat:** Full body circuit training\n**Sabtu:** Cardio 30-45 menit\n**Minggu:** Active recovery (jalan santai, stretching)\n\nTips: Mulai dengan intensitas rendah jika baru memulai, naikkan bertahap setiap 1-2 minggu. Selalu pemanasan 5-10 menit sebelum latihan! 🔥",
    },
    FallbackRule {
        keywords: &["protein", "nutrisi", "vitamin", "mineral", "suplemen"],
        response: "Panduan nutrisi dasar: 🍎\n\n**Makronutrien harian:**\n- Protein: 1.6-2.2g/kg BB (ayam, ikan, telur, tempe, tahu)\n- Karbohidrat: 45-65% dari total kalori (nasi merah, oat, ubi)\n- Lemak sehat: 20-35% (alpukat, kacang, minyak zaitun)\n\n**Mikronutrien penting:**\n- Vitamin D: 15 menit berjemur pagi\n- Zat besi: Bayam, daging merah\n- Kalsium: Susu, yoghurt, brokoli\n\nSuplemen hanya diperlukan jika asupan dari makanan kurang. Konsultasikan ke dokter terlebih dahulu! 💊",
    },
    FallbackRule {
        keywords: &["tidur", "insomnia", "susah tidur", "begadang", "ngantuk"],
        response: "Tips tidur berkualitas untuk pemulihan optimal: 😴\n\n1. **Jadwal konsisten** — tidur dan bangun di jam yang sama setiap hari\n2. **Hindari layar** 1 jam sebelum tidur (blue light mengganggu melatonin)\n3. **Suhu ruangan** ideal 18-22°C\n4. **Hindari kafein** setelah jam 2 siang\n5. **Olahraga minimal 4 jam** sebelum tidur\n6. **Teknik relaksasi** — coba 4-7-8 breathing (tarik 4 detik, tahan 7, buang 8)\n\nTidur 7-9 jam sangat penting untuk recovery otot dan produksi growth hormone! 💤",
    },
];

const CATCH_ALL: &str = "Pertanyaan yang menarik! 🤔 Sebagai AI Coach PATHRA, saya fokus membantu Anda dalam:\n\n• 🥗 **Nutrisi & diet** — menu sehat, kalori, makronutrien\n• 🏋️ **Olahraga** — program latihan, tips fitness\n• ⚖️ **Manajemen berat badan** — strategi penurunan/penambahan BB\n• 😴 **Recovery** — tips tidur, pemulihan otot\n\nCoba tanyakan salah satu topik di atas, dan saya akan berikan panduan yang lebih detail! 💪";

/// Case-insensitive substring match against the fixed rule list. Total and
/// side-effect free; always returns a non-empty reply.
pub fn respond(user_text: &str) -> &'static str {
    let normalized = user_text.to_lowercase();

    for rule in RULES {
        if rule
            .keywords
            .iter()
            .any(|keyword| normalized.contains(keyword))
        {
            return rule.response;
        }
    }

    CATCH_ALL
}
