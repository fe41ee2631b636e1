// 时间戳格式常量
const TIMESTAMP_LENGTH: usize = 19;
const MIN_LINE_LENGTH: usize = 26; // "YYYY-MM-DD HH:MM:SS Z [1]:"
const TIMESTAMP_SEPARATOR_POSITIONS: [(usize, u8); 5] =
    [(4, b'-'), (7, b'-'), (10, b' '), (13, b':'), (16, b':')];
const TIMESTAMP_DIGIT_POSITIONS: [usize; 14] = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];

const SPACE_BYTE: u8 = b' ';
const DOT_BYTE: u8 = b'.';
const OPEN_BRACKET_BYTE: u8 = b'[';
const CLOSE_BRACKET_BYTE: u8 = b']';
const COLON_BYTE: u8 = b':';

/// 期望输入恰好为 19 字节：`YYYY-MM-DD HH:MM:SS`
#[inline(always)]
pub fn is_ts_seconds_bytes(bytes: &[u8]) -> bool {
    if bytes.len() != TIMESTAMP_LENGTH {
        return false;
    }

    for &(pos, expected) in &TIMESTAMP_SEPARATOR_POSITIONS {
        if bytes[pos] != expected {
            return false;
        }
    }

    for &i in &TIMESTAMP_DIGIT_POSITIONS {
        if !bytes[i].is_ascii_digit() {
            return false;
        }
    }

    true
}

/// 跳过 `pos` 处满足 `pred` 的连续字节，返回结束位置
#[inline]
fn skip_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

///
/// 判断一行日志是否为记录起始行。
///
/// 判断标准
/// 1. 行首 19 字节符合时间戳格式 `YYYY-MM-DD HH:MM:SS`，之后可以跟 `.` 和小数秒。
/// 2. 接着是一个空格和时区标签（一个或多个大写字母）。
/// 3. 再接一个空格和方括号包围的进程号 `[PID]`。
/// 4. 进程号之后紧跟冒号。
///
/// 这就是消息正文的终止条件：只有完整匹配以上形状的行才会结束上一条记录，
/// 仅以数字开头的继续行仍属于正文。
pub fn is_record_start_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < MIN_LINE_LENGTH {
        return false;
    }

    if !is_ts_seconds_bytes(&bytes[..TIMESTAMP_LENGTH]) {
        return false;
    }

    // 可选的小数秒
    let mut pos = TIMESTAMP_LENGTH;
    if bytes[pos] == DOT_BYTE {
        let end = skip_while(bytes, pos + 1, |b| b.is_ascii_digit());
        if end == pos + 1 {
            return false;
        }
        pos = end;
    }

    // 时区标签
    if bytes.get(pos) != Some(&SPACE_BYTE) {
        return false;
    }
    let tz_end = skip_while(bytes, pos + 1, |b| b.is_ascii_uppercase());
    if tz_end == pos + 1 {
        return false;
    }
    pos = tz_end;

    // [PID]:
    if bytes.get(pos) != Some(&SPACE_BYTE) || bytes.get(pos + 1) != Some(&OPEN_BRACKET_BYTE) {
        return false;
    }
    let pid_end = skip_while(bytes, pos + 2, |b| b.is_ascii_digit());
    if pid_end == pos + 2 {
        return false;
    }

    bytes.get(pid_end) == Some(&CLOSE_BRACKET_BYTE) && bytes.get(pid_end + 1) == Some(&COLON_BYTE)
}

/// 判断输入是否像 jsonlog：第一个非空白字节为 `{`
pub fn looks_like_jsonlog(buf: &[u8]) -> Option<bool> {
    buf.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|&b| b == b'{')
}
