use crate::Idx2dI;

/// 整数 Bresenham 直线, 包含两个端点.
///
/// 主方向上每步前进一个像素, 因此相邻输出点是 8-连通的.
pub fn line((r0, c0): Idx2dI, (r1, c1): Idx2dI) -> Vec<Idx2dI> {
    let dr = (r1 - r0).abs();
    let dc = (c1 - c0).abs();
    let sr = if r1 >= r0 { 1 } else { -1 };
    let sc = if c1 >= c0 { 1 } else { -1 };

    let mut ans = Vec::with_capacity(dr.max(dc) as usize + 1);
    let (mut r, mut c) = (r0, c0);
    if dc >= dr {
        let mut err = 2 * dr - dc;
        for _ in 0..=dc {
            ans.push((r, c));
            if err > 0 {
                r += sr;
                err -= 2 * dc;
            }
            err += 2 * dr;
            c += sc;
        }
    } else {
        let mut err = 2 * dc - dr;
        for _ in 0..=dr {
            ans.push((r, c));
            if err > 0 {
                c += sc;
                err -= 2 * dr;
            }
            err += 2 * dc;
            r += sr;
        }
    }
    ans
}

/// 沿闭合多边形 `vertices` 的周长逐像素光栅化.
///
/// 每条边不含终点 (它是下一条边的起点), 因此相邻重复顶点不会产生重复像素.
/// 少于 2 个顶点时原样返回.
pub fn polygon_perimeter(vertices: &[Idx2dI]) -> Vec<Idx2dI> {
    if vertices.len() < 2 {
        return vertices.to_vec();
    }
    let mut ans: Vec<Idx2dI> = Vec::new();
    let closing = std::iter::once((vertices[vertices.len() - 1], vertices[0]));
    let edges = vertices.windows(2).map(|w| (w[0], w[1]));
    for (start, end) in edges.chain(closing) {
        let mut seg = line(start, end);
        seg.pop();
        ans.extend(seg);
    }
    ans.dedup();
    ans
}
